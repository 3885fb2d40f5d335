//! SQLite-backed implementation of the database boundary.

use std::path::PathBuf;

use rusqlite::types::ValueRef;
use rusqlite::Connection;

use super::{Connector, DatabaseError, QueryRunner, RawResult};

const MEMORY_PATH: &str = ":memory:";

/// Connector opening SQLite connections against one database path.
///
/// Holds no connection itself; every [`Connector::connect`] call opens a
/// fresh connection. Note that each in-memory connection is an independent
/// empty database, so reconnect-sensitive callers should use a file path.
pub struct SqliteConnector {
    path: PathBuf,
}

impl SqliteConnector {
    /// Connector for the database file at `path`, created on first open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Connector for an in-memory database (useful for testing).
    pub fn in_memory() -> Self {
        Self::new(MEMORY_PATH)
    }

    /// The configured database path.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Connector for SqliteConnector {
    fn connect(&self) -> Result<Box<dyn QueryRunner>, DatabaseError> {
        let conn = if self.path.as_os_str() == MEMORY_PATH {
            Connection::open_in_memory()
        } else {
            Connection::open(&self.path)
        }
        .map_err(|e| DatabaseError::Connect(e.to_string()))?;

        Ok(Box::new(SqliteRunner { conn }))
    }
}

/// One live SQLite connection.
struct SqliteRunner {
    conn: Connection,
}

impl QueryRunner for SqliteRunner {
    fn run(&mut self, query: &str) -> Result<RawResult, DatabaseError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(RawResult::empty_query());
        }

        let mut stmt = self
            .conn
            .prepare(trimmed)
            .map_err(|e| DatabaseError::Execute(e.to_string()))?;

        // Statements without result columns (DDL, INSERT, UPDATE, DELETE).
        if stmt.column_count() == 0 {
            stmt.execute([])
                .map_err(|e| DatabaseError::Execute(e.to_string()))?;
            return Ok(RawResult::command_ok());
        }

        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let mut collected = Vec::new();
        let mut rows = stmt
            .query([])
            .map_err(|e| DatabaseError::Execute(e.to_string()))?;
        while let Some(row) = rows
            .next()
            .map_err(|e| DatabaseError::Execute(e.to_string()))?
        {
            let mut record = Vec::with_capacity(columns.len());
            for idx in 0..columns.len() {
                let value = row
                    .get_ref(idx)
                    .map_err(|e| DatabaseError::Execute(e.to_string()))?;
                record.push(render_value(value));
            }
            collected.push(record);
        }

        Ok(RawResult::rows(columns, collected))
    }
}

/// Render one SQLite value as a string cell.
///
/// NULL becomes the empty string; blobs are rendered as lossy UTF-8.
fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(r) => r.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => String::from_utf8_lossy(b).into_owned(),
    }
}
