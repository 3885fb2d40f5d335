//! Worker configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the worker thread and its connection lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// How many queries a connection may serve before it is recycled
    /// (0 = unlimited).
    #[serde(default)]
    pub max_connection_reuse: u32,

    /// Close the connection after this long without work (milliseconds).
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_ms: u64,

    /// How long the worker waits on the wake signal before it checks the
    /// queue and the connection anyway (milliseconds).
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

fn default_idle_timeout() -> u64 {
    30_000 // 30 seconds
}

fn default_poll_interval() -> u64 {
    500
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_connection_reuse: 0,
            idle_timeout_ms: default_idle_timeout(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl WorkerConfig {
    /// Idle timeout as a [`Duration`].
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    /// Poll interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
