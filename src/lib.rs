//! # Reflow Scheduler
//!
//! Finite-capacity production scheduling engine.
//!
//! Given a set of work orders and the work centers they run on, a reflow pass
//! computes a new start/end instant for every order such that declared
//! dependencies are honored, each order runs only during its work center's
//! active shifts, maintenance windows are avoided, no two orders overlap on
//! the same work center, and fixed (maintenance) orders are never moved.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Domain types and identifiers shared across the crate
//! - [`models`]: Calendar primitives (local shift spans, timezone resolution)
//! - [`scheduler`]: The scheduling engine: calendar arithmetic, the
//!   dependency graph, and the reflow pass that composes them
//! - [`services`]: Non-throwing dependency diagnostics
//! - [`routes`]: Request/response types and conversions for the reflow API
//! - [`http`]: Axum-based HTTP server exposing the engine as a REST API
//!
//! ## Determinism
//!
//! A reflow call is a pure function of its arguments. Orders are processed in
//! a topological order with deterministic tie-breaking, so identical inputs
//! produce identical outputs across runs; the only permitted variation is the
//! reported processing time.

pub mod api;

pub mod models;
pub mod scheduler;

pub mod routes;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
