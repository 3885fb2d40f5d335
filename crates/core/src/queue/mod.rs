//! Thread-safe order queue and result delivery.
//!
//! [`SharedQueue`] is the single mutex-protected state machine the whole
//! engine revolves around: a FIFO deque of pending orders, the set of their
//! identifiers, a set of unresolved cancellation requests, and three outcome
//! maps (executed / cancelled / failed). The producer feeds it from the
//! caller thread, the consumer drains it from the worker thread, and every
//! outcome is announced through the bound [`Listener`].

mod listener;
mod shared;

pub use listener::Listener;
pub use shared::{QueueCounts, SharedQueue};

pub(crate) use shared::PendingView;
