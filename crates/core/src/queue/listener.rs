//! Delivery interface for order outcomes.

use crate::order::Ticket;

/// The three-callback delivery interface, bound exactly once per queue.
///
/// Callbacks receive the order's acceptance ticket as its identity snapshot;
/// the result table or error stays inside the queue until the caller
/// releases it. Callbacks are never invoked while the queue's internal lock
/// is held. `on_performed` and `on_failure` always run on the worker thread;
/// `on_cancelled` runs on whichever thread resolves the cancellation, which
/// can be the caller's own thread during a release call.
pub trait Listener: Send + Sync {
    /// The order executed successfully; its result awaits release.
    fn on_performed(&self, ticket: &Ticket);

    /// The order was cancelled before its result could be delivered.
    fn on_cancelled(&self, ticket: &Ticket);

    /// The order failed; the error awaits release.
    fn on_failure(&self, ticket: &Ticket);
}
