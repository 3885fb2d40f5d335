//! Core order and result data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Acceptance outcome for a submitted order.
///
/// This is the synchronous verdict only: whether the order entered the
/// queue. Execution success or failure is reported later through the
/// listener callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Accepted and queued for execution.
    Pending,
    /// Rejected because the pending queue is at capacity.
    Busy,
    /// Rejected, see the ticket's reason.
    Failed,
}

impl TicketStatus {
    /// Returns the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Pending => "pending",
            TicketStatus::Busy => "busy",
            TicketStatus::Failed => "failed",
        }
    }
}

/// Synchronous acknowledgment returned for a submitted order.
///
/// Immutable once produced. The same ticket value is later handed to the
/// listener callbacks as the order's identity snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    /// Identifier assigned to the accepted order; empty when acceptance failed.
    pub uuid: String,
    /// Client identity echoed back from the order.
    pub client_identity: String,
    /// Position in the pending queue at acceptance (0-based).
    pub index: u64,
    /// Pending queue length right after acceptance.
    pub total: u64,
    /// Acceptance outcome.
    pub status: TicketStatus,
    /// Rejection reason; empty on acceptance.
    pub reason: String,
    /// When the order was accepted (or rejected).
    pub accepted_at: DateTime<Utc>,
}

impl Ticket {
    pub(crate) fn pending(uuid: String, client_identity: String, index: u64, total: u64) -> Self {
        Self {
            uuid,
            client_identity,
            index,
            total,
            status: TicketStatus::Pending,
            reason: String::new(),
            accepted_at: Utc::now(),
        }
    }

    pub(crate) fn busy(client_identity: String, total: u64) -> Self {
        Self {
            uuid: String::new(),
            client_identity,
            index: 0,
            total,
            status: TicketStatus::Busy,
            reason: "pending queue at capacity".to_string(),
            accepted_at: Utc::now(),
        }
    }

    pub(crate) fn failed(client_identity: String, reason: impl Into<String>) -> Self {
        Self {
            uuid: String::new(),
            client_identity,
            index: 0,
            total: 0,
            status: TicketStatus::Failed,
            reason: reason.into(),
            accepted_at: Utc::now(),
        }
    }

    /// Whether the order behind this ticket was accepted for execution.
    pub fn is_pending(&self) -> bool {
        self.status == TicketStatus::Pending
    }
}

/// Tabular query result.
///
/// Built once by the worker from a raw database result, immutable afterwards.
/// Every row of the raw result is carried over; rows are aligned with
/// `columns` by position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Column names in select order.
    pub columns: Vec<String>,
    /// Row values, one inner vector per row.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
