//! Worker-owned database connection lifecycle.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::database::{Connector, DatabaseError, QueryRunner};
use crate::metrics;

/// The worker's connection, opened lazily and recycled by policy.
///
/// Owned exclusively by the worker thread. A connection is opened on first
/// use, dropped after `max_reuse` queries (0 = unlimited), and dropped again
/// after `idle_timeout` without work. Both checks run before an execution,
/// so a stale connection is never handed out.
pub(crate) struct ConnectionSession {
    runner: Option<Box<dyn QueryRunner>>,
    uses: u32,
    last_used: Instant,
    max_reuse: u32,
    idle_timeout: Duration,
}

impl ConnectionSession {
    pub(crate) fn new(max_reuse: u32, idle_timeout: Duration) -> Self {
        Self {
            runner: None,
            uses: 0,
            last_used: Instant::now(),
            max_reuse,
            idle_timeout,
        }
    }

    /// Hand out a live connection, opening or recycling as the policy asks.
    pub(crate) fn acquire(
        &mut self,
        connector: &dyn Connector,
    ) -> Result<&mut dyn QueryRunner, DatabaseError> {
        if self.runner.is_some() && self.max_reuse > 0 && self.uses >= self.max_reuse {
            debug!("Connection served {} queries, recycling", self.uses);
            self.recycle();
        }

        if self.runner.is_none() {
            self.runner = Some(connector.connect()?);
            self.uses = 0;
            metrics::CONNECTIONS_OPENED.inc();
            debug!("Database connection opened");
        }

        self.uses += 1;
        self.last_used = Instant::now();
        Ok(self
            .runner
            .as_mut()
            .expect("connection opened above")
            .as_mut())
    }

    /// Drop the connection after a failure so the next acquire reconnects.
    pub(crate) fn discard(&mut self) {
        if self.runner.take().is_some() {
            debug!("Discarding connection after failure");
        }
        self.uses = 0;
    }

    /// Close the connection when it sat unused past the idle timeout.
    pub(crate) fn close_if_idle(&mut self) {
        if self.runner.is_some() && self.last_used.elapsed() >= self.idle_timeout {
            debug!("Connection idle for {:?}, closing", self.last_used.elapsed());
            self.recycle();
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.runner.is_some()
    }

    fn recycle(&mut self) {
        self.runner = None;
        self.uses = 0;
        metrics::CONNECTIONS_RECYCLED.inc();
    }
}
