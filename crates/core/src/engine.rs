//! The assembled engine instance.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Config;
use crate::consumer::Consumer;
use crate::database::{Connector, SqliteConnector};
use crate::order::{Order, PendingOrder, Ticket};
use crate::producer::Producer;
use crate::queue::{Listener, SharedQueue};
use crate::signal::{CondvarSignal, WakeSignal};

/// Point-in-time engine status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EngineStatus {
    /// Whether the worker thread is running.
    pub running: bool,
    /// Orders waiting for (or undergoing) execution.
    pub pending: usize,
    /// Executed results awaiting release.
    pub executed: usize,
    /// Cancelled orders awaiting release.
    pub cancelled: usize,
    /// Failed orders awaiting release.
    pub failed: usize,
    /// Cancellation requests not yet resolved.
    pub cancellations: usize,
}

/// One query offload engine: shared queue, caller-side producer and one
/// worker thread.
///
/// Everything except the worker-internal operations is callable from the
/// owning thread: bind a [`Listener`] first, then `queue`/`cancel` orders
/// and `release_*` their outcomes. [`QueryDesk::shutdown`] stops the worker
/// and joins it; dropping the engine does the same if the caller did not.
pub struct QueryDesk {
    shared: Arc<SharedQueue>,
    producer: Producer,
    consumer: Option<Consumer>,
}

impl QueryDesk {
    /// Assemble an engine from a config, a database connector and a wake
    /// signal. Spawns the worker thread immediately.
    pub fn new(config: &Config, connector: Box<dyn Connector>, signal: Arc<dyn WakeSignal>) -> Self {
        let shared = Arc::new(SharedQueue::new(config.engine.max_pending));
        let acceptable = config.database.acceptable_statuses.iter().copied().collect();

        let consumer = Consumer::spawn(
            Arc::clone(&shared),
            connector,
            Arc::clone(&signal),
            config.worker.clone(),
            acceptable,
        );
        let producer = Producer::new(Arc::clone(&shared), signal);

        info!("Engine started");
        Self {
            shared,
            producer,
            consumer: Some(consumer),
        }
    }

    /// Assemble an engine over the configured SQLite database with the
    /// default condvar wake signal.
    pub fn open(config: &Config) -> Self {
        let connector = Box::new(SqliteConnector::new(config.database.path.clone()));
        Self::new(config, connector, Arc::new(CondvarSignal::new()))
    }

    /// Bind the delivery listener. Must happen exactly once, before any
    /// order is queued; a second bind panics.
    pub fn bind(&self, listener: Arc<dyn Listener>) {
        self.shared.bind(listener);
    }

    /// Submit an order for execution.
    pub fn queue(&self, order: Order) -> Ticket {
        self.producer.queue(order)
    }

    /// Request cancellation of a previously queued order.
    pub fn cancel(&self, ticket: &Ticket) {
        self.producer.cancel(ticket);
    }

    /// Collect an executed order's result. Returns false, silently, when
    /// the identifier is unknown (already released or cancelled).
    pub fn release_executed(&self, uuid: &str, consume: impl FnOnce(PendingOrder)) -> bool {
        let released = self.shared.release_executed(uuid, consume);
        self.producer.settle(uuid);
        released
    }

    /// Collect a cancelled order. Same missing-id semantics as
    /// [`QueryDesk::release_executed`].
    pub fn release_cancelled(&self, uuid: &str, consume: impl FnOnce(PendingOrder)) -> bool {
        let released = self.shared.release_cancelled(uuid, consume);
        self.producer.settle(uuid);
        released
    }

    /// Collect a failed order's error. Same missing-id semantics as
    /// [`QueryDesk::release_executed`].
    pub fn release_failed(&self, uuid: &str, consume: impl FnOnce(PendingOrder)) -> bool {
        let released = self.shared.release_failed(uuid, consume);
        self.producer.settle(uuid);
        released
    }

    /// Best-effort local answer to "is this order still in flight".
    pub fn is_pending(&self, uuid: &str) -> bool {
        self.producer.is_pending(uuid)
    }

    /// Locally kept submission metadata for an in-flight order.
    pub fn submitted(&self, uuid: &str) -> Option<crate::producer::SubmittedOrder> {
        self.producer.submitted(uuid)
    }

    /// Current engine status.
    pub fn status(&self) -> EngineStatus {
        let counts = self.shared.counts();
        EngineStatus {
            running: self.consumer.is_some(),
            pending: counts.pending,
            executed: counts.executed,
            cancelled: counts.cancelled,
            failed: counts.failed,
            cancellations: counts.cancellations,
        }
    }

    /// Drop every tracked order without delivery and clear the listener.
    ///
    /// Shutdown-path operation; call after [`QueryDesk::shutdown`] so the
    /// worker is quiescent.
    pub fn reset(&self) {
        self.shared.reset();
        self.producer.clear();
    }

    /// Stop the worker thread and join it. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(mut consumer) = self.consumer.take() {
            consumer.stop();
            info!("Engine stopped");
        }
    }
}

impl Drop for QueryDesk {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testing::{fixtures, RecordingListener, ScriptedConnector};

    const WAIT: Duration = Duration::from_secs(2);

    fn fast_config() -> Config {
        let mut config = Config::default();
        config.worker.poll_interval_ms = 20;
        config
    }

    fn engine(connector: ScriptedConnector) -> (QueryDesk, Arc<RecordingListener>) {
        let engine = QueryDesk::new(
            &fast_config(),
            Box::new(connector),
            Arc::new(CondvarSignal::new()),
        );
        let listener = Arc::new(RecordingListener::new());
        engine.bind(listener.clone());
        (engine, listener)
    }

    #[test]
    fn test_queue_execute_release_roundtrip() {
        let connector = ScriptedConnector::new();
        connector.push_response(Ok(fixtures::small_result()));
        let (mut engine, listener) = engine(connector);

        let ticket = engine.queue(fixtures::order("SELECT 1"));
        assert!(ticket.is_pending());
        assert!(engine.is_pending(&ticket.uuid));

        assert!(listener.wait_for_performed(1, WAIT));
        let released = engine.release_executed(&ticket.uuid, |order| {
            assert_eq!(order.result().unwrap().columns, vec!["id", "name"]);
        });
        assert!(released);
        assert!(!engine.is_pending(&ticket.uuid));
        engine.shutdown();
    }

    #[test]
    fn test_status_reflects_worker_and_counts() {
        let connector = ScriptedConnector::new();
        connector.push_response(Ok(fixtures::small_result()));
        let (mut engine, listener) = engine(connector);

        assert!(engine.status().running);
        engine.queue(fixtures::order("SELECT 1"));
        assert!(listener.wait_for_performed(1, WAIT));
        assert_eq!(engine.status().executed, 1);

        engine.shutdown();
        assert!(!engine.status().running);
        // The result is still collectable after shutdown.
        assert_eq!(engine.status().executed, 1);
    }

    #[test]
    fn test_busy_ticket_when_queue_full() {
        let connector = ScriptedConnector::new();
        connector.hold_executions();
        let mut config = fast_config();
        config.engine.max_pending = 1;

        let engine = QueryDesk::new(
            &config,
            Box::new(connector.clone()),
            Arc::new(CondvarSignal::new()),
        );
        engine.bind(Arc::new(RecordingListener::new()));

        let first = engine.queue(fixtures::order("SELECT 1"));
        assert!(first.is_pending());

        // The worker cannot dequeue the gated order, so the deque stays at
        // capacity until the gate opens.
        let rejected = engine.queue(fixtures::order("SELECT 2"));
        assert_eq!(rejected.status, crate::order::TicketStatus::Busy);

        connector.release_executions();
        drop(engine);
    }

    #[test]
    fn test_reset_after_shutdown_clears_everything() {
        let connector = ScriptedConnector::new();
        connector.push_response(Ok(fixtures::small_result()));
        let (mut engine, listener) = engine(connector);

        let ticket = engine.queue(fixtures::order("SELECT 1"));
        assert!(listener.wait_for_performed(1, WAIT));

        engine.shutdown();
        engine.reset();

        let status = engine.status();
        assert_eq!(status.executed, 0);
        assert_eq!(status.pending, 0);
        assert!(!engine.release_executed(&ticket.uuid, |_| panic!("reset dropped this order")));
        assert!(!engine.is_pending(&ticket.uuid));
    }

    #[test]
    fn test_shutdown_is_idempotent_and_runs_on_drop() {
        let (mut engine, _listener) = engine(ScriptedConnector::new());
        engine.shutdown();
        engine.shutdown();
        drop(engine);
    }
}
