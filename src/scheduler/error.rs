//! Error types for the scheduling engine.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type for scheduling operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Errors produced by the scheduling engine. Any error aborts the whole
/// reflow; no per-order error is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// An order references a work center that was not supplied.
    #[error("work order '{work_order_id}' references unknown work center '{work_center_id}'")]
    MissingWorkCenter {
        work_order_id: String,
        work_center_id: String,
    },

    /// An order depends on an order id that was not supplied.
    #[error("work order '{work_order_id}' depends on unknown work order '{missing_dependency_id}'")]
    MissingDependency {
        work_order_id: String,
        missing_dependency_id: String,
    },

    /// The dependency graph contains a cycle. The list is a witness path
    /// that re-encounters its first id.
    #[error("circular dependency detected: {}", .cycle.join(" -> "))]
    CircularDependency { cycle: Vec<String> },

    /// The calendar search exhausted its horizon without finding a slot.
    #[error("no workable slot on work center '{work_center_id}' within {horizon_days} days of {from}")]
    NoWorkableSlot {
        work_center_id: String,
        from: DateTime<Utc>,
        horizon_days: i64,
    },
}
