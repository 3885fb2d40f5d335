//! Types crossing the database boundary.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::order::Table;

/// Classification of a completed query, before acceptability filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    /// Statement completed without producing rows (DDL, INSERT, UPDATE).
    CommandOk,
    /// Statement produced zero or more rows.
    RowsReturned,
    /// The submitted text contained no statement.
    EmptyQuery,
}

impl ResultStatus {
    /// Returns the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultStatus::CommandOk => "command_ok",
            ResultStatus::RowsReturned => "rows_returned",
            ResultStatus::EmptyQuery => "empty_query",
        }
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw outcome of one query execution: the status plus every returned row,
/// already rendered to strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResult {
    /// Result classification.
    pub status: ResultStatus,
    /// Column names in select order; empty for row-less statements.
    pub columns: Vec<String>,
    /// All returned rows, aligned with `columns`.
    pub rows: Vec<Vec<String>>,
}

impl RawResult {
    /// Result of a statement that produced no rows.
    pub fn command_ok() -> Self {
        Self {
            status: ResultStatus::CommandOk,
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Result of a row-producing statement.
    pub fn rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            status: ResultStatus::RowsReturned,
            columns,
            rows,
        }
    }

    /// Result of an empty statement.
    pub fn empty_query() -> Self {
        Self {
            status: ResultStatus::EmptyQuery,
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Materialize the result as a [`Table`], carrying over every row.
    pub fn into_table(self) -> Table {
        Table {
            columns: self.columns,
            rows: self.rows,
        }
    }
}

/// Errors crossing the database boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatabaseError {
    /// Opening a connection failed.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The database rejected or failed the statement.
    #[error("query execution failed: {0}")]
    Execute(String),

    /// The query completed but its status is not in the acceptable set.
    #[error("result status {status} not acceptable")]
    Rejected {
        /// Status the query completed with.
        status: ResultStatus,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(ResultStatus::CommandOk.as_str(), "command_ok");
        assert_eq!(ResultStatus::RowsReturned.as_str(), "rows_returned");
        assert_eq!(ResultStatus::EmptyQuery.as_str(), "empty_query");
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&ResultStatus::RowsReturned).unwrap();
        assert_eq!(json, "\"rows_returned\"");
        let parsed: ResultStatus = serde_json::from_str("\"command_ok\"").unwrap();
        assert_eq!(parsed, ResultStatus::CommandOk);
    }

    #[test]
    fn test_into_table_keeps_every_row() {
        let raw = RawResult::rows(
            vec!["id".to_string(), "name".to_string()],
            vec![
                vec!["1".to_string(), "a".to_string()],
                vec!["2".to_string(), "b".to_string()],
                vec!["3".to_string(), "c".to_string()],
            ],
        );
        let table = raw.into_table();
        assert_eq!(table.columns, vec!["id", "name"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.rows[2], vec!["3", "c"]);
    }

    #[test]
    fn test_error_display() {
        let err = DatabaseError::Connect("no such file".to_string());
        assert_eq!(err.to_string(), "connection failed: no such file");

        let err = DatabaseError::Rejected {
            status: ResultStatus::EmptyQuery,
        };
        assert_eq!(err.to_string(), "result status empty_query not acceptable");
    }
}
