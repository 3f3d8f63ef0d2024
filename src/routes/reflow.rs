//! Request/response types for the reflow endpoint, plus the conversion from
//! wire shapes into domain records.
//!
//! Structural validation (hour/day ranges, negative durations, unknown
//! timezone, duplicate ids) happens here, before the engine runs; the engine
//! itself only sees well-formed domain values.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::api::{
    MaintenanceWindow, ReflowOutput, ShiftDefinition, WorkCenter, WorkCenterId, WorkOrder,
    WorkOrderId,
};

/// Request body for a reflow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflowRequest {
    pub work_orders: Vec<WorkOrderDoc>,
    pub work_centers: Vec<WorkCenterDoc>,
    /// Permit schedules earlier than the original start (default false).
    #[serde(default)]
    pub allow_earlier_start: Option<bool>,
    /// IANA timezone name governing shift interpretation (default UTC).
    #[serde(default)]
    pub timezone: Option<String>,
}

/// A work order document: id plus payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderDoc {
    pub doc_id: String,
    pub data: WorkOrderData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderData {
    pub work_order_number: String,
    pub work_center_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub duration_minutes: i64,
    #[serde(default)]
    pub is_maintenance: bool,
    #[serde(default)]
    pub depends_on_work_order_ids: Vec<String>,
}

/// A work center document: id plus payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkCenterDoc {
    pub doc_id: String,
    pub data: WorkCenterData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkCenterData {
    pub name: String,
    pub shifts: Vec<ShiftDto>,
    #[serde(default)]
    pub maintenance_windows: Vec<MaintenanceWindowDto>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftDto {
    pub day_of_week: u8,
    pub start_hour: u8,
    pub end_hour: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceWindowDto {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Response body for a successful reflow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflowResponse {
    pub results: Vec<ReflowResultDto>,
    pub warnings: Vec<String>,
    pub metadata: ReflowMetadataDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflowResultDto {
    pub work_order_id: String,
    pub work_order_number: String,
    pub original_start_date: DateTime<Utc>,
    pub original_end_date: DateTime<Utc>,
    pub new_start_date: DateTime<Utc>,
    pub new_end_date: DateTime<Utc>,
    pub was_rescheduled: bool,
    pub is_fixed: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflowMetadataDto {
    pub total_orders: usize,
    pub rescheduled_count: usize,
    pub fixed_count: usize,
    pub processing_time_ms: u64,
}

/// Domain-level view of a parsed request.
#[derive(Debug, Clone)]
pub struct ReflowInput {
    pub orders: Vec<WorkOrder>,
    pub work_centers: Vec<WorkCenter>,
    pub allow_earlier_start: bool,
    pub timezone: Tz,
}

impl ReflowRequest {
    /// Validate the wire shapes and convert them into domain records.
    ///
    /// Returns a human-readable message for the first structural problem
    /// found; reference-level problems (unknown work center, unknown
    /// dependency) are left to the engine.
    pub fn into_domain(self) -> Result<ReflowInput, String> {
        let timezone = match self.timezone.as_deref() {
            None | Some("") => chrono_tz::UTC,
            Some(name) => {
                Tz::from_str(name).map_err(|_| format!("unknown timezone '{name}'"))?
            }
        };

        let mut seen_orders = std::collections::HashSet::new();
        let mut orders = Vec::with_capacity(self.work_orders.len());
        for doc in self.work_orders {
            if !seen_orders.insert(doc.doc_id.clone()) {
                return Err(format!("duplicate work order id '{}'", doc.doc_id));
            }
            if doc.data.duration_minutes < 0 {
                return Err(format!(
                    "work order '{}' has negative durationMinutes {}",
                    doc.doc_id, doc.data.duration_minutes
                ));
            }
            let mut order = WorkOrder::new(
                WorkOrderId::new(doc.doc_id),
                doc.data.work_order_number,
                WorkCenterId::new(doc.data.work_center_id),
                doc.data.start_date,
                doc.data.end_date,
                doc.data.duration_minutes,
            )
            .with_dependencies(
                doc.data
                    .depends_on_work_order_ids
                    .into_iter()
                    .map(WorkOrderId::new)
                    .collect(),
            );
            if doc.data.is_maintenance {
                order = order.as_maintenance();
            }
            orders.push(order);
        }

        let mut seen_centers = std::collections::HashSet::new();
        let mut work_centers = Vec::with_capacity(self.work_centers.len());
        for doc in self.work_centers {
            if !seen_centers.insert(doc.doc_id.clone()) {
                return Err(format!("duplicate work center id '{}'", doc.doc_id));
            }
            let mut shifts = Vec::with_capacity(doc.data.shifts.len());
            for shift in &doc.data.shifts {
                if shift.day_of_week > 6 {
                    return Err(format!(
                        "work center '{}' has shift with dayOfWeek {} (expected 0..=6)",
                        doc.doc_id, shift.day_of_week
                    ));
                }
                if shift.start_hour > 23 || shift.end_hour > 23 {
                    return Err(format!(
                        "work center '{}' has shift with hours outside 0..=23",
                        doc.doc_id
                    ));
                }
                shifts.push(ShiftDefinition::new(
                    shift.day_of_week,
                    shift.start_hour,
                    shift.end_hour,
                ));
            }
            let mut wc = WorkCenter::new(WorkCenterId::new(doc.doc_id), doc.data.name, shifts);
            for window in doc.data.maintenance_windows {
                let mut mw = MaintenanceWindow::new(window.start_date, window.end_date);
                if let Some(reason) = window.reason {
                    mw = mw.with_reason(reason);
                }
                wc = wc.with_maintenance_window(mw);
            }
            work_centers.push(wc);
        }

        Ok(ReflowInput {
            orders,
            work_centers,
            allow_earlier_start: self.allow_earlier_start.unwrap_or(false),
            timezone,
        })
    }
}

impl From<ReflowOutput> for ReflowResponse {
    fn from(output: ReflowOutput) -> Self {
        Self {
            results: output
                .results
                .into_iter()
                .map(|r| ReflowResultDto {
                    work_order_id: r.work_order_id.0,
                    work_order_number: r.work_order_number,
                    original_start_date: r.original_start,
                    original_end_date: r.original_end,
                    new_start_date: r.new_start,
                    new_end_date: r.new_end,
                    was_rescheduled: r.was_rescheduled,
                    is_fixed: r.is_fixed,
                })
                .collect(),
            warnings: output.warnings,
            metadata: ReflowMetadataDto {
                total_orders: output.metadata.total_orders,
                rescheduled_count: output.metadata.rescheduled_count,
                fixed_count: output.metadata.fixed_count,
                processing_time_ms: output.metadata.processing_time_ms,
            },
        }
    }
}
