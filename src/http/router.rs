//! Axum router wiring for the reflow API.
//!
//! Assembles the versioned route table and the middleware stack
//! (permissive CORS, response compression, request tracing, body limit).

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Build the application router with every endpoint and layer attached.
pub fn create_router(state: AppState) -> Router {
    // Wide-open CORS; deployments that need to lock down origins do so in
    // front of this service.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        .route("/reflow", post(handlers::reflow))
        .route("/reflow/validate", post(handlers::validate));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        // Allow large schedules in a single request body.
        .layer(DefaultBodyLimit::max(16 * 1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_creation() {
        let _router = create_router(AppState::new());
    }
}
