//! Recording listener for testing.

use std::sync::Mutex;
use std::time::Duration;

use crate::order::Ticket;
use crate::queue::Listener;

use super::wait_until;

/// Listener implementation that records every delivery.
///
/// Accessors return snapshots, and the `wait_for_*` helpers poll with a
/// bound so tests driving a real worker thread never hang on a missed
/// delivery.
#[derive(Debug, Default)]
pub struct RecordingListener {
    performed: Mutex<Vec<Ticket>>,
    cancelled: Mutex<Vec<Ticket>>,
    failed: Mutex<Vec<Ticket>>,
}

impl RecordingListener {
    /// Create a listener with no recorded deliveries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tickets delivered through `on_performed`, in delivery order.
    pub fn performed(&self) -> Vec<Ticket> {
        self.performed.lock().unwrap().clone()
    }

    /// Tickets delivered through `on_cancelled`, in delivery order.
    pub fn cancelled(&self) -> Vec<Ticket> {
        self.cancelled.lock().unwrap().clone()
    }

    /// Tickets delivered through `on_failure`, in delivery order.
    pub fn failed(&self) -> Vec<Ticket> {
        self.failed.lock().unwrap().clone()
    }

    pub fn performed_count(&self) -> usize {
        self.performed.lock().unwrap().len()
    }

    pub fn cancelled_count(&self) -> usize {
        self.cancelled.lock().unwrap().len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.lock().unwrap().len()
    }

    /// Total deliveries across all three callbacks.
    pub fn total_count(&self) -> usize {
        self.performed_count() + self.cancelled_count() + self.failed_count()
    }

    /// Wait until at least `count` `on_performed` deliveries arrived.
    pub fn wait_for_performed(&self, count: usize, timeout: Duration) -> bool {
        wait_until(|| self.performed_count() >= count, timeout)
    }

    /// Wait until at least `count` `on_cancelled` deliveries arrived.
    pub fn wait_for_cancelled(&self, count: usize, timeout: Duration) -> bool {
        wait_until(|| self.cancelled_count() >= count, timeout)
    }

    /// Wait until at least `count` `on_failure` deliveries arrived.
    pub fn wait_for_failed(&self, count: usize, timeout: Duration) -> bool {
        wait_until(|| self.failed_count() >= count, timeout)
    }
}

impl Listener for RecordingListener {
    fn on_performed(&self, ticket: &Ticket) {
        self.performed.lock().unwrap().push(ticket.clone());
    }

    fn on_cancelled(&self, ticket: &Ticket) {
        self.cancelled.lock().unwrap().push(ticket.clone());
    }

    fn on_failure(&self, ticket: &Ticket) {
        self.failed.lock().unwrap().push(ticket.clone());
    }
}
