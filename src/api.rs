//! Public API surface for the scheduling engine.
//!
//! This file consolidates the domain types shared across the crate.
//! All types derive Serialize/Deserialize for JSON serialization.

pub use crate::routes::reflow::{
    MaintenanceWindowDto, ReflowMetadataDto, ReflowRequest, ReflowResponse, ReflowResultDto,
    ShiftDto, WorkCenterData, WorkCenterDoc, WorkOrderData, WorkOrderDoc,
};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Work order identifier (opaque string, unique within a reflow request).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkOrderId(pub String);

/// Work center identifier (opaque string).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkCenterId(pub String);

impl WorkOrderId {
    pub fn new(value: impl Into<String>) -> Self {
        WorkOrderId(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl WorkCenterId {
    pub fn new(value: impl Into<String>) -> Self {
        WorkCenterId(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WorkOrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for WorkCenterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WorkOrderId {
    fn from(value: &str) -> Self {
        WorkOrderId::new(value)
    }
}
impl From<&str> for WorkCenterId {
    fn from(value: &str) -> Self {
        WorkCenterId::new(value)
    }
}

/// One recurring weekly shift on a work center.
///
/// `day_of_week` is 0..=6 with 0 = Sunday, interpreted in the configured
/// timezone. When `end_hour < start_hour` the shift wraps past midnight into
/// the next calendar day. `end_hour == start_hour` means zero minutes and the
/// shift contributes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftDefinition {
    /// Day of week, 0 = Sunday .. 6 = Saturday
    pub day_of_week: u8,
    /// Local hour the shift starts, 0..=23
    pub start_hour: u8,
    /// Local hour the shift ends, 0..=23 (exclusive)
    pub end_hour: u8,
}

impl ShiftDefinition {
    pub fn new(day_of_week: u8, start_hour: u8, end_hour: u8) -> Self {
        Self {
            day_of_week,
            start_hour,
            end_hour,
        }
    }
}

/// Absolute interval `[start, end)` in UTC during which a work center cannot
/// run work. Takes precedence over shifts; overlapping windows are allowed
/// and the union applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl MaintenanceWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Whether an instant falls inside this window (inclusive start,
    /// exclusive end).
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }
}

/// A machine or resource with a weekly shift calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkCenter {
    pub id: WorkCenterId,
    pub name: String,
    /// Weekly shift calendar; multiple shifts per day form a union.
    pub shifts: Vec<ShiftDefinition>,
    /// Absolute blackout intervals; the union applies.
    #[serde(default)]
    pub maintenance_windows: Vec<MaintenanceWindow>,
}

impl WorkCenter {
    pub fn new(id: impl Into<WorkCenterId>, name: impl Into<String>, shifts: Vec<ShiftDefinition>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            shifts,
            maintenance_windows: Vec::new(),
        }
    }

    pub fn with_maintenance_window(mut self, window: MaintenanceWindow) -> Self {
        self.maintenance_windows.push(window);
        self
    }
}

/// A unit of production work to be placed on the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrder {
    pub id: WorkOrderId,
    /// Human-readable label; never used for logic.
    pub number: String,
    /// The work center this order runs on.
    pub work_center: WorkCenterId,
    /// Original planned start (UTC).
    pub start_date: DateTime<Utc>,
    /// Original planned end (UTC).
    pub end_date: DateTime<Utc>,
    /// Required working duration in whole minutes.
    pub duration_minutes: i64,
    /// Maintenance orders are fixed and never moved.
    #[serde(default)]
    pub is_maintenance: bool,
    /// Identifiers of orders that must finish before this one starts.
    /// Ordered on input but treated as a set.
    #[serde(default)]
    pub depends_on: Vec<WorkOrderId>,
}

impl WorkOrder {
    pub fn new(
        id: impl Into<WorkOrderId>,
        number: impl Into<String>,
        work_center: impl Into<WorkCenterId>,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        duration_minutes: i64,
    ) -> Self {
        Self {
            id: id.into(),
            number: number.into(),
            work_center: work_center.into(),
            start_date,
            end_date,
            duration_minutes,
            is_maintenance: false,
            depends_on: Vec::new(),
        }
    }

    pub fn with_dependencies(mut self, depends_on: Vec<WorkOrderId>) -> Self {
        self.depends_on = depends_on;
        self
    }

    pub fn as_maintenance(mut self) -> Self {
        self.is_maintenance = true;
        self
    }
}

/// Per-call scheduling configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReflowConfig {
    /// Permit a schedule earlier than the original start when upstream
    /// constraints allow it.
    pub allow_earlier_start: bool,
    /// IANA timezone governing all shift interpretation.
    pub timezone: Tz,
    /// Reference instant used when an order has no start constraints at all
    /// (allow_earlier_start, no machine history, no dependencies). Stamped by
    /// the caller so a reflow stays a pure function of its arguments.
    pub now: DateTime<Utc>,
}

impl ReflowConfig {
    pub fn new(allow_earlier_start: bool, timezone: Tz, now: DateTime<Utc>) -> Self {
        Self {
            allow_earlier_start,
            timezone,
            now,
        }
    }
}

impl Default for ReflowConfig {
    fn default() -> Self {
        Self {
            allow_earlier_start: false,
            timezone: chrono_tz::UTC,
            now: Utc::now(),
        }
    }
}

/// Scheduling outcome for a single work order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflowResult {
    pub work_order_id: WorkOrderId,
    pub work_order_number: String,
    pub original_start: DateTime<Utc>,
    pub original_end: DateTime<Utc>,
    pub new_start: DateTime<Utc>,
    pub new_end: DateTime<Utc>,
    /// True iff either endpoint moved.
    pub was_rescheduled: bool,
    /// True iff the order was a maintenance order.
    pub is_fixed: bool,
}

/// Aggregate counters for one reflow pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflowMetadata {
    pub total_orders: usize,
    pub rescheduled_count: usize,
    pub fixed_count: usize,
    pub processing_time_ms: u64,
}

/// Full output of a reflow pass. Results are in processing (topological)
/// order, not input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflowOutput {
    pub results: Vec<ReflowResult>,
    pub warnings: Vec<String>,
    pub metadata: ReflowMetadata,
}
