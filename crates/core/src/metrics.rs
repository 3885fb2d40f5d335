//! Prometheus metrics for the engine.
//!
//! This module provides metrics for:
//! - Order flow (enqueued, rejected, executed, cancelled, failed)
//! - Worker connection lifecycle (opened, recycled)
//! - Query execution duration

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Order flow
// =============================================================================

/// Orders accepted into the pending queue.
pub static ORDERS_ENQUEUED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("querydesk_orders_enqueued_total", "Total orders accepted").unwrap()
});

/// Orders rejected at acceptance, by reason.
pub static ORDERS_REJECTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "querydesk_orders_rejected_total",
            "Total orders rejected at acceptance",
        ),
        &["reason"], // "busy", "collision"
    )
    .unwrap()
});

/// Orders executed successfully.
pub static ORDERS_EXECUTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "querydesk_orders_executed_total",
        "Total orders executed successfully",
    )
    .unwrap()
});

/// Orders resolved as cancelled.
pub static ORDERS_CANCELLED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "querydesk_orders_cancelled_total",
        "Total orders resolved as cancelled",
    )
    .unwrap()
});

/// Orders that failed execution.
pub static ORDERS_FAILED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "querydesk_orders_failed_total",
        "Total orders that failed execution",
    )
    .unwrap()
});

// =============================================================================
// Worker connection lifecycle
// =============================================================================

/// Database connections opened by the worker.
pub static CONNECTIONS_OPENED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "querydesk_connections_opened_total",
        "Total database connections opened",
    )
    .unwrap()
});

/// Connections dropped because the reuse limit or idle timeout was reached.
pub static CONNECTIONS_RECYCLED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "querydesk_connections_recycled_total",
        "Total database connections recycled",
    )
    .unwrap()
});

/// Query execution duration in seconds, as observed by the worker.
pub static QUERY_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "querydesk_query_duration_seconds",
            "Duration of query execution",
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0]),
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all engine metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(ORDERS_ENQUEUED.clone()),
        Box::new(ORDERS_REJECTED.clone()),
        Box::new(ORDERS_EXECUTED.clone()),
        Box::new(ORDERS_CANCELLED.clone()),
        Box::new(ORDERS_FAILED.clone()),
        Box::new(CONNECTIONS_OPENED.clone()),
        Box::new(CONNECTIONS_RECYCLED.clone()),
        Box::new(QUERY_DURATION.clone()),
    ]
}
