//! Database error types

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Query(#[from] sqlx::Error),

    #[error("CSV source not found at {}", .0.display())]
    MissingSource(PathBuf),

    #[error("Invalid CSV source {}: {reason}", .path.display())]
    InvalidSource { path: PathBuf, reason: String },

    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
