//! Caller-side façade over the shared queue.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::order::{Order, Ticket};
use crate::queue::SharedQueue;
use crate::signal::WakeSignal;

/// Metadata the producer keeps about an order it submitted.
#[derive(Debug, Clone)]
pub struct SubmittedOrder {
    /// The submitted query text.
    pub query: String,
    /// The submitting client's identity.
    pub client_identity: String,
    /// When the order was accepted.
    pub submitted_at: DateTime<Utc>,
}

/// Caller-thread façade over [`SharedQueue`].
///
/// `queue` accepts an order and wakes the worker; `cancel` records a
/// cancellation without waking it. The producer additionally keeps its own
/// map of submitted orders so "is this still pending" can be answered
/// without taking the shared lock a second time. That map is best-effort
/// bookkeeping only; the shared queue stays the source of truth for
/// delivery.
pub struct Producer {
    shared: Arc<SharedQueue>,
    signal: Arc<dyn WakeSignal>,
    submitted: Mutex<HashMap<String, SubmittedOrder>>,
}

impl Producer {
    pub(crate) fn new(shared: Arc<SharedQueue>, signal: Arc<dyn WakeSignal>) -> Self {
        Self {
            shared,
            signal,
            submitted: Mutex::new(HashMap::new()),
        }
    }

    /// Submit an order and wake the worker when it was accepted.
    pub fn queue(&self, order: Order) -> Ticket {
        let query = order.query().to_string();
        let ticket = self.shared.enqueue(order);
        if ticket.is_pending() {
            self.submitted.lock().unwrap().insert(
                ticket.uuid.clone(),
                SubmittedOrder {
                    query,
                    client_identity: ticket.client_identity.clone(),
                    submitted_at: ticket.accepted_at,
                },
            );
            self.signal.notify();
        }
        ticket
    }

    /// Request cancellation for a previously returned ticket.
    ///
    /// Does not wake the worker: an idle worker has nothing to cancel, and
    /// a busy one resolves the request at its next queue access. The local
    /// bookkeeping keeps the order until its outcome is released, since the
    /// cancellation may lose the race and a performed result can still
    /// arrive.
    pub fn cancel(&self, ticket: &Ticket) {
        if ticket.uuid.is_empty() {
            return;
        }
        self.shared.cancel(ticket);
        debug!("Cancellation requested for {}", ticket.uuid);
    }

    /// Best-effort local answer to "is this order still in flight here".
    ///
    /// May report true for an order whose result is already waiting for
    /// release; the queue's counts are authoritative.
    pub fn is_pending(&self, uuid: &str) -> bool {
        self.submitted.lock().unwrap().contains_key(uuid)
    }

    /// Locally kept metadata for a submitted order.
    pub fn submitted(&self, uuid: &str) -> Option<SubmittedOrder> {
        self.submitted.lock().unwrap().get(uuid).cloned()
    }

    /// Number of orders tracked locally.
    pub fn submitted_count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }

    /// Drop local bookkeeping for an order that settled.
    pub(crate) fn settle(&self, uuid: &str) {
        self.submitted.lock().unwrap().remove(uuid);
    }

    /// Drop all local bookkeeping.
    pub(crate) fn clear(&self) {
        self.submitted.lock().unwrap().clear();
    }
}
