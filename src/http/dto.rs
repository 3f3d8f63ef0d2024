//! Data Transfer Objects for the HTTP API.
//!
//! The reflow request/response DTOs live with their route; this module holds
//! the remaining endpoint shapes and re-exports the route DTOs so handlers
//! import from one place.

use serde::{Deserialize, Serialize};

pub use crate::routes::reflow::{
    MaintenanceWindowDto, ReflowMetadataDto, ReflowRequest, ReflowResponse, ReflowResultDto,
    ShiftDto, WorkCenterData, WorkCenterDoc, WorkOrderData, WorkOrderDoc,
};
pub use crate::services::validation::DependencyIssue;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Seconds since the server started
    pub uptime_seconds: u64,
}

/// Response for the dependency validation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    /// True when no issues were found
    pub valid: bool,
    pub issues: Vec<DependencyIssue>,
}
