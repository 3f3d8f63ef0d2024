//! HTTP server module.
//!
//! Exposes the scheduling engine as a REST API. The engine itself is pure;
//! this layer owns request parsing, structural validation, JSON mapping, and
//! the error-to-status translation.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
