//! ASK Core Business Logic
//!
//! This crate provides the import pipeline (mirror sync, bulk load and
//! provenance tracking) and the read-only query engine: airport search,
//! great-circle distance and timezone resolution.

pub mod error;
pub mod geo;
pub mod import;
pub mod provenance;
pub mod query;
pub mod timezone;
pub mod validation;

pub use error::{CoreError, ImportError, ProvenanceError};
pub use geo::{Coordinates, EARTH_RADIUS_NM, haversine_nm};
pub use import::{ImportReport, ImportService, TableImport};
pub use provenance::ProvenanceTracker;
pub use query::{AirportTime, DistanceReport, QueryService};
pub use timezone::{LocalTime, TimezoneError, TimezoneResolver, TzfResolver};
pub use validation::ValidationError;
