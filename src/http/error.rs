//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::scheduler::ScheduleError;

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Request was structurally malformed.
    BadRequest(String),
    /// The scheduling engine rejected the input.
    Schedule(ScheduleError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match self {
            AppError::BadRequest(message) => json!({
                "statusCode": 400,
                "error": "ValidationError",
                "message": message,
            }),
            AppError::Schedule(err) => {
                let message = err.to_string();
                match err {
                    ScheduleError::CircularDependency { cycle } => json!({
                        "statusCode": 400,
                        "error": "CircularDependencyError",
                        "message": message,
                        "cycle": cycle,
                    }),
                    ScheduleError::MissingDependency {
                        work_order_id,
                        missing_dependency_id,
                    } => json!({
                        "statusCode": 400,
                        "error": "MissingDependencyError",
                        "message": message,
                        "workOrderId": work_order_id,
                        "missingDependencyId": missing_dependency_id,
                    }),
                    ScheduleError::MissingWorkCenter {
                        work_order_id,
                        work_center_id,
                    } => json!({
                        "statusCode": 400,
                        "error": "MissingWorkCenterError",
                        "message": message,
                        "workOrderId": work_order_id,
                        "workCenterId": work_center_id,
                    }),
                    ScheduleError::NoWorkableSlot { work_center_id, .. } => json!({
                        "statusCode": 400,
                        "error": "NoWorkableSlotError",
                        "message": message,
                        "workCenterId": work_center_id,
                    }),
                }
            }
        };

        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        AppError::Schedule(err)
    }
}
