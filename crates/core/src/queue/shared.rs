//! The shared order ledger at the center of the engine.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::database::{DatabaseError, RawResult};
use crate::metrics;
use crate::order::{Order, PendingOrder, Ticket};

use super::Listener;

/// Worker-side view of the front pending order.
///
/// Produced by `peek`, consumed by exactly one `dequeue_*` call. Carries
/// copies so the worker never holds a reference into the locked state.
#[derive(Debug, Clone)]
pub(crate) struct PendingView {
    pub(crate) uuid: String,
    pub(crate) query: String,
}

/// Point-in-time structure counts, for status reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueCounts {
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

#[derive(Default)]
struct QueueState {
    pending: VecDeque<PendingOrder>,
    /// Identifiers of pending orders; always the same length as `pending`.
    ids: HashSet<String>,
    /// Cancellation requests awaiting resolution.
    cancellations: HashSet<String>,
    executed: HashMap<String, PendingOrder>,
    cancelled: HashMap<String, PendingOrder>,
    failed: HashMap<String, PendingOrder>,
    listener: Option<Arc<dyn Listener>>,
}

/// Thread-safe order ledger shared between the caller thread and the worker.
///
/// All operations serialize on one internal lock, which is only ever held
/// for in-memory bookkeeping. Caller-side operations (`enqueue`, `cancel`,
/// `release_*`, `bind`, `reset`) are public; worker-side operations (`peek`,
/// `dequeue_*`) are crate-private so only the consumer loop can reach them.
/// Listener callbacks and per-order capabilities are always invoked after
/// the lock has been released.
pub struct SharedQueue {
    state: Mutex<QueueState>,
    max_pending: usize,
}

impl SharedQueue {
    /// Create a queue accepting up to `max_pending` queued orders
    /// (0 = unlimited).
    pub fn new(max_pending: usize) -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            max_pending,
        }
    }

    /// Bind the delivery listener.
    ///
    /// Must happen before any order is enqueued and exactly once; a second
    /// bind is a protocol violation and panics.
    pub fn bind(&self, listener: Arc<dyn Listener>) {
        let mut state = self.state.lock().unwrap();
        assert!(state.listener.is_none(), "listener already bound");
        state.listener = Some(listener);
    }

    /// Drop every tracked order and the listener without any delivery.
    ///
    /// Shutdown-path operation: the worker must be quiescent, otherwise an
    /// in-flight `dequeue_*` will trip the front-of-queue assertion.
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap();
        let dropped = state.pending.len()
            + state.executed.len()
            + state.cancelled.len()
            + state.failed.len();
        state.pending.clear();
        state.ids.clear();
        state.cancellations.clear();
        state.executed.clear();
        state.cancelled.clear();
        state.failed.clear();
        state.listener = None;
        if dropped > 0 {
            debug!("Reset dropped {} order(s) without delivery", dropped);
        }
    }

    /// Accept an order into the pending queue, returning its ticket.
    ///
    /// Rejections are reported through the ticket's status, never as an
    /// error: `Busy` when the queue is at capacity, `Failed` when the
    /// generated identifier collides with any tracked order. A collision
    /// leaves the queue untouched.
    pub fn enqueue(&self, order: Order) -> Ticket {
        let mut state = self.state.lock().unwrap();
        let depth = state.pending.len();

        if self.max_pending > 0 && depth >= self.max_pending {
            metrics::ORDERS_REJECTED.with_label_values(&["busy"]).inc();
            warn!(
                "Pending queue at capacity ({}), rejecting order from {}",
                depth,
                order.client_identity()
            );
            return Ticket::busy(order.client_identity, depth as u64);
        }

        let uuid = format!("{}:{}:{}", Uuid::new_v4(), order.client_identity, depth);
        // Insert-if-absent: the outcome maps are checked before the set
        // insert, so a hit never leaves a stray id behind.
        if state.executed.contains_key(&uuid)
            || state.cancelled.contains_key(&uuid)
            || state.failed.contains_key(&uuid)
            || !state.ids.insert(uuid.clone())
        {
            metrics::ORDERS_REJECTED
                .with_label_values(&["collision"])
                .inc();
            warn!("Identifier collision on {}, rejecting order", uuid);
            return Ticket::failed(order.client_identity, "identifier collision");
        }

        let ticket = Ticket::pending(
            uuid,
            order.client_identity.clone(),
            depth as u64,
            depth as u64 + 1,
        );
        state.pending.push_back(PendingOrder::new(ticket.clone(), order));
        debug_assert_eq!(state.ids.len(), state.pending.len());
        metrics::ORDERS_ENQUEUED.inc();
        debug!("Order {} accepted at index {}", ticket.uuid, ticket.index);
        ticket
    }

    /// Record a cancellation request for the ticket's order.
    ///
    /// Never blocks on execution and never takes immediate effect: the
    /// request is resolved lazily by the next purge, which either removes
    /// the order before the worker sees it or suppresses the delivery of a
    /// result already recorded.
    pub fn cancel(&self, ticket: &Ticket) {
        if ticket.uuid.is_empty() {
            return;
        }
        let mut state = self.state.lock().unwrap();
        state.cancellations.insert(ticket.uuid.clone());
        debug!("Cancellation recorded for {}", ticket.uuid);
    }

    /// Current structure counts.
    pub fn counts(&self) -> QueueCounts {
        let state = self.state.lock().unwrap();
        QueueCounts {
            pending: state.pending.len(),
            executed: state.executed.len(),
            cancelled: state.cancelled.len(),
            failed: state.failed.len(),
            cancellations: state.cancellations.len(),
        }
    }

    /// Look up an executed order and hand it to `consume`.
    ///
    /// Returns false, without invoking `consume`, when the identifier is
    /// unknown (already released, or purged by a cancellation). Outstanding
    /// cancellations are resolved against the outcome maps first, so a
    /// cancel-then-release observes the suppression deterministically.
    pub fn release_executed(&self, uuid: &str, consume: impl FnOnce(PendingOrder)) -> bool {
        self.release_from(uuid, |state| &mut state.executed, consume)
    }

    /// Look up a cancelled order and hand it to `consume`. See
    /// [`SharedQueue::release_executed`] for the missing-id semantics.
    pub fn release_cancelled(&self, uuid: &str, consume: impl FnOnce(PendingOrder)) -> bool {
        self.release_from(uuid, |state| &mut state.cancelled, consume)
    }

    /// Look up a failed order and hand it to `consume`. See
    /// [`SharedQueue::release_executed`] for the missing-id semantics.
    pub fn release_failed(&self, uuid: &str, consume: impl FnOnce(PendingOrder)) -> bool {
        self.release_from(uuid, |state| &mut state.failed, consume)
    }

    fn release_from(
        &self,
        uuid: &str,
        pick: fn(&mut QueueState) -> &mut HashMap<String, PendingOrder>,
        consume: impl FnOnce(PendingOrder),
    ) -> bool {
        let mut state = self.state.lock().unwrap();
        Self::purge_outcomes_locked(&mut state);
        let Some(order) = pick(&mut state).remove(uuid) else {
            debug!("Release of unknown order {} ignored", uuid);
            return false;
        };
        drop(state);
        consume(order);
        true
    }

    /// Copy the front pending order for the worker, without removing it.
    ///
    /// Resolves all outstanding cancellations first; `None` means the queue
    /// is empty after that purge.
    pub(crate) fn peek(&self) -> Option<PendingView> {
        let mut state = self.state.lock().unwrap();
        let notices = Self::purge_all_locked(&mut state);
        let view = state.pending.front().map(|order| PendingView {
            uuid: order.uuid().to_string(),
            query: order.query().to_string(),
        });
        let listener = if notices.is_empty() {
            None
        } else {
            state.listener.clone()
        };
        drop(state);

        for ticket in &notices {
            metrics::ORDERS_CANCELLED.inc();
            debug!("Order {} cancelled before execution", ticket.uuid);
            if let Some(listener) = &listener {
                listener.on_cancelled(ticket);
            }
        }
        view
    }

    /// Whether a cancellation request is outstanding for `uuid`.
    pub(crate) fn is_cancelled(&self, uuid: &str) -> bool {
        self.state.lock().unwrap().cancellations.contains(uuid)
    }

    /// Record a successful execution for the order previously peeked.
    ///
    /// A cancellation that raced in since the peek wins: the order is
    /// parked as cancelled and no table is built.
    pub(crate) fn dequeue_executed(&self, view: PendingView, raw: RawResult) {
        let mut state = self.state.lock().unwrap();
        let mut front = Self::take_front_locked(&mut state, &view);

        if state.cancellations.remove(front.uuid()) {
            self.finish_cancelled(state, front);
            return;
        }

        front.set_result(raw.into_table());
        let ticket = front.ticket().clone();
        let callback = front.take_on_success();
        state.executed.insert(ticket.uuid.clone(), front);
        let listener = state.listener.clone();
        drop(state);

        metrics::ORDERS_EXECUTED.inc();
        debug!("Order {} executed", ticket.uuid);
        if let Some(callback) = callback {
            callback(&ticket);
        }
        if let Some(listener) = listener {
            listener.on_performed(&ticket);
        }
    }

    /// Park the order previously peeked as cancelled without executing it.
    /// Used by the worker when it finds a cancellation before running the
    /// query.
    pub(crate) fn dequeue_cancelled(&self, view: PendingView) {
        let mut state = self.state.lock().unwrap();
        let front = Self::take_front_locked(&mut state, &view);
        state.cancellations.remove(front.uuid());
        self.finish_cancelled(state, front);
    }

    /// Record a failed execution for the order previously peeked.
    ///
    /// The same cancellation race as [`SharedQueue::dequeue_executed`]
    /// applies and resolves in favor of cancellation.
    pub(crate) fn dequeue_failed(&self, view: PendingView, error: DatabaseError) {
        let mut state = self.state.lock().unwrap();
        let mut front = Self::take_front_locked(&mut state, &view);

        if state.cancellations.remove(front.uuid()) {
            self.finish_cancelled(state, front);
            return;
        }

        let summary = error.to_string();
        front.set_error(error);
        let ticket = front.ticket().clone();
        let callback = front.take_on_failure();
        state.failed.insert(ticket.uuid.clone(), front);
        let listener = state.listener.clone();
        drop(state);

        metrics::ORDERS_FAILED.inc();
        debug!("Order {} failed: {}", ticket.uuid, summary);
        if let Some(callback) = callback {
            callback(&ticket);
        }
        if let Some(listener) = listener {
            listener.on_failure(&ticket);
        }
    }

    /// Pop the front order, enforcing the peek/dequeue protocol.
    fn take_front_locked(state: &mut QueueState, view: &PendingView) -> PendingOrder {
        let front = state
            .pending
            .pop_front()
            .unwrap_or_else(|| panic!("dequeue of {} with no pending order", view.uuid));
        assert_eq!(
            front.uuid(),
            view.uuid,
            "dequeue does not match the queue front"
        );
        let removed = state.ids.remove(front.uuid());
        debug_assert!(removed);
        front
    }

    /// Park `order` in the cancelled map and notify, releasing the lock
    /// before the callback runs.
    fn finish_cancelled(
        &self,
        mut state: std::sync::MutexGuard<'_, QueueState>,
        order: PendingOrder,
    ) {
        let ticket = order.ticket().clone();
        state.cancelled.insert(ticket.uuid.clone(), order);
        let listener = state.listener.clone();
        drop(state);

        metrics::ORDERS_CANCELLED.inc();
        debug!("Order {} cancelled before result delivery", ticket.uuid);
        if let Some(listener) = listener {
            listener.on_cancelled(&ticket);
        }
    }

    /// Resolve every outstanding cancellation: rebuild the pending deque
    /// without the cancelled orders (their tickets are returned so the
    /// caller can notify), erase matches from the outcome maps silently,
    /// then clear the cancellation set.
    fn purge_all_locked(state: &mut QueueState) -> Vec<Ticket> {
        if state.cancellations.is_empty() {
            return Vec::new();
        }
        let cancellations = std::mem::take(&mut state.cancellations);
        let mut notices = Vec::new();

        let drained = std::mem::take(&mut state.pending);
        for order in drained {
            if cancellations.contains(order.uuid()) {
                state.ids.remove(order.uuid());
                notices.push(order.ticket().clone());
            } else {
                state.pending.push_back(order);
            }
        }
        for uuid in &cancellations {
            state.executed.remove(uuid);
            state.cancelled.remove(uuid);
            state.failed.remove(uuid);
        }
        debug_assert_eq!(state.ids.len(), state.pending.len());
        notices
    }

    /// Resolve outstanding cancellations against the outcome maps only,
    /// erasing matches silently. Pending-side cancellations stay recorded
    /// so the next full purge still delivers their notification.
    fn purge_outcomes_locked(state: &mut QueueState) {
        if state.cancellations.is_empty() {
            return;
        }
        let ids: Vec<String> = state.cancellations.iter().cloned().collect();
        let mut purged = 0usize;
        for uuid in ids {
            let hit = state.executed.remove(&uuid).is_some()
                || state.cancelled.remove(&uuid).is_some()
                || state.failed.remove(&uuid).is_some();
            if hit {
                state.cancellations.remove(&uuid);
                purged += 1;
            }
        }
        if purged > 0 {
            debug!("Suppressed {} undelivered result(s) after cancellation", purged);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::testing::RecordingListener;

    fn queue() -> SharedQueue {
        SharedQueue::new(0)
    }

    fn order(n: usize) -> Order {
        Order::new(format!("SELECT {}", n), "client-a")
    }

    fn ok_result() -> RawResult {
        RawResult::rows(
            vec!["id".to_string(), "name".to_string()],
            vec![vec!["1".to_string(), "a".to_string()]],
        )
    }

    #[test]
    fn test_enqueue_assigns_distinct_ids() {
        let queue = queue();
        let mut uuids = HashSet::new();
        for n in 0..5 {
            let ticket = queue.enqueue(order(n));
            assert!(ticket.is_pending());
            assert_eq!(ticket.index, n as u64);
            assert_eq!(ticket.total, n as u64 + 1);
            assert!(uuids.insert(ticket.uuid.clone()));
            assert_eq!(queue.counts().pending, n + 1);
        }
        assert_eq!(uuids.len(), 5);
    }

    #[test]
    fn test_identifier_embeds_client_identity() {
        let ticket = queue().enqueue(Order::new("SELECT 1", "session-42"));
        assert!(ticket.uuid.contains("session-42"));
        assert!(ticket.uuid.ends_with(":0"));
    }

    #[test]
    fn test_enqueue_rejects_when_at_capacity() {
        let queue = SharedQueue::new(2);
        assert!(queue.enqueue(order(0)).is_pending());
        assert!(queue.enqueue(order(1)).is_pending());

        let rejected = queue.enqueue(order(2));
        assert_eq!(rejected.status, crate::order::TicketStatus::Busy);
        assert!(rejected.uuid.is_empty());
        assert_eq!(queue.counts().pending, 2);
    }

    #[test]
    fn test_cancel_before_peek_never_surfaces() {
        let queue = queue();
        let listener = Arc::new(RecordingListener::new());
        queue.bind(listener.clone());

        let ticket = queue.enqueue(order(0));
        queue.cancel(&ticket);

        assert!(queue.peek().is_none());
        assert_eq!(listener.cancelled_count(), 1);
        assert_eq!(listener.cancelled()[0].uuid, ticket.uuid);

        // Resolved, not left dangling: nothing fires twice.
        assert!(queue.peek().is_none());
        assert_eq!(listener.cancelled_count(), 1);
        assert_eq!(queue.counts(), QueueCounts::default());
    }

    #[test]
    fn test_peek_copies_front_without_removing() {
        let queue = queue();
        let first = queue.enqueue(order(0));
        queue.enqueue(order(1));

        let view = queue.peek().unwrap();
        assert_eq!(view.uuid, first.uuid);
        assert_eq!(view.query, "SELECT 0");
        assert_eq!(queue.counts().pending, 2);

        // Peeking again surfaces the same front.
        assert_eq!(queue.peek().unwrap().uuid, first.uuid);
    }

    #[test]
    fn test_dequeue_executed_builds_table_from_all_rows() {
        let queue = queue();
        let listener = Arc::new(RecordingListener::new());
        queue.bind(listener.clone());

        let ticket = queue.enqueue(order(0));
        let view = queue.peek().unwrap();
        let raw = RawResult::rows(
            vec!["id".to_string(), "name".to_string()],
            vec![
                vec!["1".to_string(), "a".to_string()],
                vec!["2".to_string(), "b".to_string()],
            ],
        );
        queue.dequeue_executed(view, raw);

        assert_eq!(listener.performed_count(), 1);
        assert_eq!(listener.performed()[0].uuid, ticket.uuid);
        assert_eq!(queue.counts().executed, 1);
        assert_eq!(queue.counts().pending, 0);

        let released = queue.release_executed(&ticket.uuid, |order| {
            let table = order.result().expect("executed order carries a table");
            assert_eq!(table.columns, vec!["id", "name"]);
            assert_eq!(
                table.rows,
                vec![
                    vec!["1".to_string(), "a".to_string()],
                    vec!["2".to_string(), "b".to_string()],
                ]
            );
        });
        assert!(released);
        assert_eq!(queue.counts().executed, 0);
    }

    #[test]
    fn test_per_order_callbacks_fire_on_their_outcome() {
        let queue = queue();
        let successes = Arc::new(AtomicUsize::new(0));
        let failures = Arc::new(AtomicUsize::new(0));

        let on_success = Arc::clone(&successes);
        let on_failure = Arc::clone(&failures);
        queue.enqueue(
            Order::new("SELECT 1", "client-a")
                .with_on_success(move |_| {
                    on_success.fetch_add(1, Ordering::SeqCst);
                })
                .with_on_failure(move |_| {
                    on_failure.fetch_add(1, Ordering::SeqCst);
                }),
        );
        let view = queue.peek().unwrap();
        queue.dequeue_executed(view, ok_result());
        assert_eq!(successes.load(Ordering::SeqCst), 1);
        assert_eq!(failures.load(Ordering::SeqCst), 0);

        let on_failure = Arc::clone(&failures);
        queue.enqueue(Order::new("SELECT 2", "client-a").with_on_failure(move |_| {
            on_failure.fetch_add(1, Ordering::SeqCst);
        }));
        let view = queue.peek().unwrap();
        queue.dequeue_failed(view, DatabaseError::Execute("boom".to_string()));
        assert_eq!(failures.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cancel_between_peek_and_dequeue_wins() {
        let queue = queue();
        let listener = Arc::new(RecordingListener::new());
        queue.bind(listener.clone());

        let ticket = queue.enqueue(order(0));
        let view = queue.peek().unwrap();
        queue.cancel(&ticket);
        queue.dequeue_executed(view, ok_result());

        assert_eq!(listener.performed_count(), 0);
        assert_eq!(listener.cancelled_count(), 1);
        assert_eq!(queue.counts().cancelled, 1);
        assert_eq!(queue.counts().executed, 0);

        let released = queue.release_cancelled(&ticket.uuid, |order| {
            assert!(order.result().is_none());
        });
        assert!(released);
    }

    #[test]
    fn test_cancel_between_peek_and_dequeue_failed_wins() {
        let queue = queue();
        let listener = Arc::new(RecordingListener::new());
        queue.bind(listener.clone());

        let ticket = queue.enqueue(order(0));
        let view = queue.peek().unwrap();
        queue.cancel(&ticket);
        queue.dequeue_failed(view, DatabaseError::Execute("boom".to_string()));

        assert_eq!(listener.failed_count(), 0);
        assert_eq!(listener.cancelled_count(), 1);
        assert_eq!(queue.counts().cancelled, 1);
    }

    #[test]
    fn test_dequeue_failed_attaches_error() {
        let queue = queue();
        let listener = Arc::new(RecordingListener::new());
        queue.bind(listener.clone());

        let ticket = queue.enqueue(order(0));
        let view = queue.peek().unwrap();
        queue.dequeue_failed(view, DatabaseError::Execute("no such table".to_string()));

        assert_eq!(listener.failed_count(), 1);
        let released = queue.release_failed(&ticket.uuid, |order| {
            assert_eq!(
                order.error(),
                Some(&DatabaseError::Execute("no such table".to_string()))
            );
        });
        assert!(released);
    }

    #[test]
    fn test_release_twice_is_a_noop() {
        let queue = queue();
        let ticket = queue.enqueue(order(0));
        let view = queue.peek().unwrap();
        queue.dequeue_executed(view, ok_result());

        let consumed = Arc::new(AtomicUsize::new(0));
        let first = Arc::clone(&consumed);
        assert!(queue.release_executed(&ticket.uuid, move |_| {
            first.fetch_add(1, Ordering::SeqCst);
        }));
        let second = Arc::clone(&consumed);
        assert!(!queue.release_executed(&ticket.uuid, move |_| {
            second.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(consumed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_release_unknown_uuid_is_a_noop() {
        let queue = queue();
        assert!(!queue.release_executed("nope", |_| panic!("must not be invoked")));
        assert!(!queue.release_cancelled("nope", |_| panic!("must not be invoked")));
        assert!(!queue.release_failed("nope", |_| panic!("must not be invoked")));
    }

    #[test]
    fn test_cancel_after_execution_suppresses_release() {
        let queue = queue();
        let listener = Arc::new(RecordingListener::new());
        queue.bind(listener.clone());

        let ticket = queue.enqueue(order(0));
        let view = queue.peek().unwrap();
        queue.dequeue_executed(view, ok_result());
        assert_eq!(listener.performed_count(), 1);

        // The result sits in the executed map; cancelling now must make the
        // release observe nothing, silently.
        queue.cancel(&ticket);
        assert!(!queue.release_executed(&ticket.uuid, |_| panic!("delivery was cancelled")));
        assert!(!queue.release_cancelled(&ticket.uuid, |_| panic!("delivery was cancelled")));
        assert_eq!(listener.cancelled_count(), 0);
        assert_eq!(queue.counts(), QueueCounts::default());
    }

    #[test]
    fn test_fifo_order_is_preserved() {
        let queue = queue();
        let tickets: Vec<Ticket> = (0..4).map(|n| queue.enqueue(order(n))).collect();

        let mut surfaced = Vec::new();
        while let Some(view) = queue.peek() {
            surfaced.push(view.uuid.clone());
            queue.dequeue_executed(view, RawResult::command_ok());
        }

        let submitted: Vec<String> = tickets.into_iter().map(|t| t.uuid).collect();
        assert_eq!(surfaced, submitted);
    }

    #[test]
    fn test_reset_drains_everything_silently() {
        let queue = queue();
        let listener = Arc::new(RecordingListener::new());
        queue.bind(listener.clone());

        let executed = queue.enqueue(order(0));
        let cancelled = queue.enqueue(order(1));
        queue.enqueue(order(2));

        let view = queue.peek().unwrap();
        queue.dequeue_executed(view, ok_result());
        queue.cancel(&cancelled);

        let performed_before = listener.performed_count();
        let cancelled_before = listener.cancelled_count();
        queue.reset();

        assert_eq!(queue.counts(), QueueCounts::default());
        assert_eq!(listener.performed_count(), performed_before);
        assert_eq!(listener.cancelled_count(), cancelled_before);
        assert!(!queue.release_executed(&executed.uuid, |_| panic!("reset dropped this order")));

        // Reset also cleared the listener, so a fresh bind is legal again.
        queue.bind(Arc::new(RecordingListener::new()));
    }

    #[test]
    #[should_panic(expected = "listener already bound")]
    fn test_double_bind_panics() {
        let queue = queue();
        queue.bind(Arc::new(RecordingListener::new()));
        queue.bind(Arc::new(RecordingListener::new()));
    }

    #[test]
    #[should_panic(expected = "dequeue does not match the queue front")]
    fn test_dequeue_out_of_order_panics() {
        let queue = queue();
        queue.enqueue(order(0));
        queue.enqueue(order(1));

        let view = queue.peek().unwrap();
        queue.dequeue_executed(view.clone(), RawResult::command_ok());
        // The view now points at an order that is no longer the front.
        queue.dequeue_executed(view, RawResult::command_ok());
    }

    #[test]
    #[should_panic(expected = "no pending order")]
    fn test_dequeue_on_empty_queue_panics() {
        let queue = queue();
        queue.dequeue_executed(
            PendingView {
                uuid: "ghost".to_string(),
                query: String::new(),
            },
            RawResult::command_ok(),
        );
    }
}
