//! Service layer: diagnostics that sit beside the scheduling engine.

pub mod validation;

pub use validation::{validate_dependencies, DependencyIssue};
