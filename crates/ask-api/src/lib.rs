//! ASK REST API
//!
//! This crate provides the Axum-based HTTP API for ASK: airport search,
//! distance and local time queries, reference data, import provenance,
//! health and metrics.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppState, MetricsHandle};
