//! The worker thread draining the shared queue.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use crate::database::{Connector, DatabaseError, RawResult, ResultStatus};
use crate::metrics;
use crate::queue::{PendingView, SharedQueue};
use crate::signal::WakeSignal;

use super::config::WorkerConfig;
use super::session::ConnectionSession;

/// Owns the worker thread executing queries against the database.
///
/// The loop blocks on the wake signal (bounded by the poll interval so
/// connection maintenance still runs), peeks the queue, executes the front
/// order and records the outcome through one of the queue's dequeue
/// operations. A failing order never terminates the thread; only
/// [`Consumer::stop`] does.
pub(crate) struct Consumer {
    running: Arc<AtomicBool>,
    signal: Arc<dyn WakeSignal>,
    handle: Option<JoinHandle<()>>,
}

impl Consumer {
    /// Spawn the worker thread.
    pub(crate) fn spawn(
        shared: Arc<SharedQueue>,
        connector: Box<dyn Connector>,
        signal: Arc<dyn WakeSignal>,
        config: WorkerConfig,
        acceptable: HashSet<ResultStatus>,
    ) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let thread_running = Arc::clone(&running);
        let thread_signal = Arc::clone(&signal);

        let handle = thread::Builder::new()
            .name("querydesk-worker".to_string())
            .spawn(move || {
                info!("Worker thread started");
                let mut session =
                    ConnectionSession::new(config.max_connection_reuse, config.idle_timeout());

                while thread_running.load(Ordering::Relaxed) {
                    thread_signal.wait_timeout(config.poll_interval());

                    while thread_running.load(Ordering::Relaxed) {
                        let Some(view) = shared.peek() else {
                            break;
                        };
                        // A cancellation can land right after the peek's
                        // purge; skip the query instead of running it.
                        if shared.is_cancelled(&view.uuid) {
                            shared.dequeue_cancelled(view);
                            continue;
                        }
                        Self::execute(&shared, connector.as_ref(), &mut session, &acceptable, view);
                    }

                    session.close_if_idle();
                }
                info!("Worker thread stopped");
            })
            .expect("failed to spawn worker thread");

        Self {
            running,
            signal,
            handle: Some(handle),
        }
    }

    /// Stop the worker and join its thread. Idempotent.
    pub(crate) fn stop(&mut self) {
        if self.running.swap(false, Ordering::SeqCst) {
            self.signal.notify();
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Worker thread terminated with a panic");
            }
        }
    }

    /// Execute the peeked order and record its outcome.
    ///
    /// A connection or execution failure drops the connection and retries
    /// once on a fresh one; a second failure marks the order failed. A
    /// rejected status is never retried: the statement already ran, so
    /// running it again would duplicate its side effects. The cancellation
    /// race between peek and dequeue is resolved inside the queue.
    fn execute(
        shared: &SharedQueue,
        connector: &dyn Connector,
        session: &mut ConnectionSession,
        acceptable: &HashSet<ResultStatus>,
        view: PendingView,
    ) {
        match Self::attempt(connector, session, acceptable, &view.query) {
            Ok(raw) => shared.dequeue_executed(view, raw),
            Err(rejected @ DatabaseError::Rejected { .. }) => {
                shared.dequeue_failed(view, rejected);
            }
            Err(first) => {
                session.discard();
                debug!("Order {} failed ({}), retrying on a fresh connection", view.uuid, first);
                match Self::attempt(connector, session, acceptable, &view.query) {
                    Ok(raw) => shared.dequeue_executed(view, raw),
                    Err(err) => {
                        session.discard();
                        shared.dequeue_failed(view, err);
                    }
                }
            }
        }
    }

    /// One execution attempt: live connection, run, acceptability check.
    fn attempt(
        connector: &dyn Connector,
        session: &mut ConnectionSession,
        acceptable: &HashSet<ResultStatus>,
        query: &str,
    ) -> Result<RawResult, DatabaseError> {
        let runner = session.acquire(connector)?;
        let timer = metrics::QUERY_DURATION.start_timer();
        let raw = runner.run(query);
        drop(timer);
        let raw = raw?;
        if acceptable.contains(&raw.status) {
            Ok(raw)
        } else {
            Err(DatabaseError::Rejected { status: raw.status })
        }
    }
}

impl Drop for Consumer {
    fn drop(&mut self) {
        self.stop();
    }
}
