//! Application state for the HTTP server.

use std::time::Instant;

/// Shared application state passed to all handlers.
///
/// The scheduler is pure, so the state carries only service metadata.
#[derive(Clone)]
pub struct AppState {
    /// Instant the server started, for health reporting.
    pub started_at: Instant,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
