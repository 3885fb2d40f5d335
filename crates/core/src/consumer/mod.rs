//! The worker side of the engine.
//!
//! One thread per engine instance: wait for the wake signal, peek the
//! shared queue, execute the front order against the database and record
//! the outcome. The database connection is owned here and never crosses
//! the thread boundary; its lifecycle (lazy open, reuse cap, idle close)
//! is driven by [`WorkerConfig`].

mod config;
mod session;
mod worker;

pub use config::WorkerConfig;

pub(crate) use worker::Consumer;
