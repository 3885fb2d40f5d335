//! Cross-thread wake-up primitive.
//!
//! The producer signals the worker through a [`WakeSignal`]; the worker
//! waits on it with a timeout so it can also run periodic connection
//! maintenance. The engine only needs signal and wait-with-timeout
//! semantics, so an embedding event loop may supply its own primitive
//! (e.g. one backed by a self-pipe) instead of [`CondvarSignal`].

use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// Signal-and-wait primitive connecting the caller thread to the worker.
pub trait WakeSignal: Send + Sync {
    /// Wake the waiting side. Notifications latch: a notify with no waiter
    /// is consumed by the next wait.
    fn notify(&self);

    /// Wait until notified or until `timeout` elapses. Returns `true` when
    /// a notification was consumed, `false` on timeout.
    fn wait_timeout(&self, timeout: Duration) -> bool;
}

/// Default [`WakeSignal`] over a mutex-guarded flag and a condvar.
pub struct CondvarSignal {
    notified: Mutex<bool>,
    condvar: Condvar,
}

impl CondvarSignal {
    pub fn new() -> Self {
        Self {
            notified: Mutex::new(false),
            condvar: Condvar::new(),
        }
    }
}

impl Default for CondvarSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl WakeSignal for CondvarSignal {
    fn notify(&self) {
        let mut notified = self.notified.lock().unwrap();
        *notified = true;
        self.condvar.notify_one();
    }

    fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut notified = self.notified.lock().unwrap();
        loop {
            if *notified {
                *notified = false;
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            // The deadline check above absorbs spurious wakeups.
            let (guard, _) = self
                .condvar
                .wait_timeout(notified, deadline - now)
                .unwrap();
            notified = guard;
        }
    }
}
