//! Database boundary: text-in, rows-out.
//!
//! The engine never prepares statements or touches a binary protocol. A
//! [`Connector`] opens connections, a [`QueryRunner`] executes one textual
//! statement at a time, and every outcome is a [`RawResult`] or a
//! [`DatabaseError`]. Connection lifecycle (reuse, idle close, reconnect)
//! is the worker's concern, not this module's.

mod sqlite;
mod types;

pub use sqlite::SqliteConnector;
pub use types::{DatabaseError, RawResult, ResultStatus};

/// Opens database connections.
///
/// Called only from the worker thread. Each call yields an independent
/// connection; the connector itself holds no connection state.
pub trait Connector: Send {
    /// Open a fresh connection.
    fn connect(&self) -> Result<Box<dyn QueryRunner>, DatabaseError>;
}

/// One live database connection executing textual statements.
pub trait QueryRunner: Send {
    /// Execute a single statement and collect the full result.
    fn run(&mut self, query: &str) -> Result<RawResult, DatabaseError>;
}
