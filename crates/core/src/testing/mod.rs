//! Testing utilities and scripted implementations for engine tests.
//!
//! This module provides controllable stand-ins for the engine's two
//! external seams, the delivery listener and the database boundary,
//! allowing deterministic tests without a real database.
//!
//! # Example
//!
//! ```rust,ignore
//! use querydesk_core::testing::{fixtures, RecordingListener, ScriptedConnector};
//!
//! let connector = ScriptedConnector::new();
//! connector.push_response(Ok(fixtures::small_result()));
//!
//! let listener = Arc::new(RecordingListener::new());
//! // Wire both into a queue or an engine...
//! ```

mod recording_listener;
mod scripted_database;

use std::thread;
use std::time::{Duration, Instant};

pub use recording_listener::RecordingListener;
pub use scripted_database::ScriptedConnector;

/// Poll `check` until it returns true or `timeout` elapses; returns the
/// final verdict. Backs the listener's `wait_for_*` helpers and any test
/// waiting on a worker-thread side effect.
pub fn wait_until(mut check: impl FnMut() -> bool, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if check() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    check()
}

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::database::RawResult;
    use crate::order::Order;

    /// Create a test order with a default client identity.
    pub fn order(query: &str) -> Order {
        Order::new(query, "test-client")
    }

    /// A two-column, one-row result.
    pub fn small_result() -> RawResult {
        RawResult::rows(
            vec!["id".to_string(), "name".to_string()],
            vec![vec!["1".to_string(), "a".to_string()]],
        )
    }

    /// A result spanning several rows.
    pub fn multi_row_result(rows: usize) -> RawResult {
        RawResult::rows(
            vec!["n".to_string()],
            (0..rows).map(|n| vec![n.to_string()]).collect(),
        )
    }
}
