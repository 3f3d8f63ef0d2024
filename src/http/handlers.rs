//! HTTP handlers for the REST API.
//!
//! Each handler parses and validates the wire shapes, then delegates to the
//! scheduling engine or the validation service.

use axum::{extract::State, Json};
use chrono::Utc;
use tracing::info;

use super::dto::{HealthResponse, ReflowRequest, ReflowResponse, ValidateResponse};
use super::error::AppError;
use super::state::AppState;
use crate::api::ReflowConfig;
use crate::scheduler::ReflowScheduler;
use crate::services::validation;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// GET /health
///
/// Health check endpoint to verify the service is running.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

/// POST /v1/reflow
///
/// Run one reflow pass over the supplied work orders and work centers.
pub async fn reflow(Json(request): Json<ReflowRequest>) -> HandlerResult<ReflowResponse> {
    let input = request.into_domain().map_err(AppError::BadRequest)?;

    let config = ReflowConfig::new(input.allow_earlier_start, input.timezone, Utc::now());
    let scheduler = ReflowScheduler::new(input.work_centers, config);
    let output = scheduler.reflow(&input.orders)?;

    info!(
        total = output.metadata.total_orders,
        rescheduled = output.metadata.rescheduled_count,
        elapsed_ms = output.metadata.processing_time_ms,
        "reflow request served"
    );

    Ok(Json(output.into()))
}

/// POST /v1/reflow/validate
///
/// Non-throwing pre-flight: collect every dependency issue in the request
/// without scheduling anything.
pub async fn validate(Json(request): Json<ReflowRequest>) -> HandlerResult<ValidateResponse> {
    let input = request.into_domain().map_err(AppError::BadRequest)?;
    let issues = validation::validate_dependencies(&input.orders);

    Ok(Json(ValidateResponse {
        valid: issues.is_empty(),
        issues,
    }))
}
