//! Caller-submitted orders and the engine-owned records tracking them.

use std::fmt;

use crate::database::DatabaseError;

use super::{Table, Ticket};

/// Per-order capability invoked when the order reaches a terminal outcome.
/// Consumed on invocation.
pub type OrderCallback = Box<dyn FnOnce(&Ticket) + Send + 'static>;

/// A caller-submitted request to run a query.
///
/// The client identity is an opaque key (session id, connection id); the
/// engine never interprets it. It participates in the order's identifier and
/// is echoed back on every delivery.
pub struct Order {
    pub(crate) query: String,
    pub(crate) client_identity: String,
    pub(crate) on_success: Option<OrderCallback>,
    pub(crate) on_failure: Option<OrderCallback>,
}

impl Order {
    /// Create an order for the given query text and client identity.
    pub fn new(query: impl Into<String>, client_identity: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            client_identity: client_identity.into(),
            on_success: None,
            on_failure: None,
        }
    }

    /// Attach a capability invoked when this order executes successfully.
    ///
    /// The callback fires on the worker thread, before the bound listener's
    /// `on_performed`, and never while internal locks are held.
    pub fn with_on_success(mut self, callback: impl FnOnce(&Ticket) + Send + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    /// Attach a capability invoked when this order fails.
    pub fn with_on_failure(mut self, callback: impl FnOnce(&Ticket) + Send + 'static) -> Self {
        self.on_failure = Some(Box::new(callback));
        self
    }

    /// The query text to execute.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The submitting client's identity.
    pub fn client_identity(&self) -> &str {
        &self.client_identity
    }
}

impl fmt::Debug for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Order")
            .field("query", &self.query)
            .field("client_identity", &self.client_identity)
            .field("on_success", &self.on_success.is_some())
            .field("on_failure", &self.on_failure.is_some())
            .finish()
    }
}

/// An accepted order tracked through its lifecycle.
///
/// Created on acceptance and owned by the queue while pending, moved into
/// exactly one outcome map when the worker records a result, then consumed
/// when the caller releases it (or dropped wholesale on reset). Single
/// ownership makes use-after-release unrepresentable.
pub struct PendingOrder {
    ticket: Ticket,
    query: String,
    on_success: Option<OrderCallback>,
    on_failure: Option<OrderCallback>,
    result: Option<Table>,
    error: Option<DatabaseError>,
}

impl PendingOrder {
    pub(crate) fn new(ticket: Ticket, order: Order) -> Self {
        Self {
            ticket,
            query: order.query,
            on_success: order.on_success,
            on_failure: order.on_failure,
            result: None,
            error: None,
        }
    }

    /// Identifier assigned at acceptance.
    pub fn uuid(&self) -> &str {
        &self.ticket.uuid
    }

    /// The query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The submitting client's identity.
    pub fn client_identity(&self) -> &str {
        &self.ticket.client_identity
    }

    /// The acceptance ticket, reused as the delivery snapshot.
    pub fn ticket(&self) -> &Ticket {
        &self.ticket
    }

    /// Execution result, present only after a successful execution.
    pub fn result(&self) -> Option<&Table> {
        self.result.as_ref()
    }

    /// Execution error, present only after a failed execution.
    pub fn error(&self) -> Option<&DatabaseError> {
        self.error.as_ref()
    }

    /// Consume the record, yielding the result table if there is one.
    pub fn into_result(self) -> Option<Table> {
        self.result
    }

    /// Consume the record, yielding the execution error if there is one.
    pub fn into_error(self) -> Option<DatabaseError> {
        self.error
    }

    pub(crate) fn set_result(&mut self, table: Table) {
        self.result = Some(table);
    }

    pub(crate) fn set_error(&mut self, error: DatabaseError) {
        self.error = Some(error);
    }

    pub(crate) fn take_on_success(&mut self) -> Option<OrderCallback> {
        self.on_success.take()
    }

    pub(crate) fn take_on_failure(&mut self) -> Option<OrderCallback> {
        self.on_failure.take()
    }
}

impl fmt::Debug for PendingOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingOrder")
            .field("uuid", &self.ticket.uuid)
            .field("query", &self.query)
            .field("has_result", &self.result.is_some())
            .field("has_error", &self.error.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    fn record(query: &str) -> PendingOrder {
        let order = Order::new(query, "client-a");
        let ticket = Ticket::pending("u-1".to_string(), "client-a".to_string(), 0, 1);
        PendingOrder::new(ticket, order)
    }

    #[test]
    fn test_order_builder() {
        let order = Order::new("SELECT 1", "client-a").with_on_success(|_| {});
        assert_eq!(order.query(), "SELECT 1");
        assert_eq!(order.client_identity(), "client-a");
        assert!(order.on_success.is_some());
        assert!(order.on_failure.is_none());
    }

    #[test]
    fn test_record_starts_without_outcome() {
        let record = record("SELECT 1");
        assert_eq!(record.uuid(), "u-1");
        assert_eq!(record.query(), "SELECT 1");
        assert!(record.result().is_none());
        assert!(record.error().is_none());
    }

    #[test]
    fn test_record_carries_result() {
        let mut record = record("SELECT 1");
        record.set_result(Table {
            columns: vec!["1".to_string()],
            rows: vec![vec!["1".to_string()]],
        });
        let table = record.into_result().unwrap();
        assert_eq!(table.columns, vec!["1"]);
    }

    #[test]
    fn test_callback_taken_once() {
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_cb = Arc::clone(&fired);
        let order = Order::new("SELECT 1", "client-a").with_on_success(move |_| {
            fired_cb.fetch_add(1, Ordering::SeqCst);
        });
        let ticket = Ticket::pending("u-1".to_string(), "client-a".to_string(), 0, 1);
        let mut record = PendingOrder::new(ticket, order);

        let callback = record.take_on_success().unwrap();
        callback(record.ticket());
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(record.take_on_success().is_none());
    }

    #[test]
    fn test_debug_hides_callbacks() {
        let debug = format!("{:?}", record("SELECT 1"));
        assert!(debug.contains("u-1"));
        assert!(debug.contains("has_result"));
    }
}
