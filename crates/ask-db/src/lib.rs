//! ASK Database Layer
//!
//! This crate provides the relational store for the airport replica:
//! schema management, the transactional CSV bulk loader, provenance rows
//! and the read-only queries used by the query engine. SQLite via sqlx.

pub mod error;
pub mod models;
pub mod repository;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::DbError;
pub use models::*;
pub use repository::Database;

/// Re-export sqlx types for convenience
pub use sqlx::SqlitePool;
