//! Core error types

use ask_db::{DataTable, DbError};
use ask_mirror::MirrorError;
use thiserror::Error;

use crate::timezone::TimezoneError;
use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Mirror error: {0}")]
    Mirror(#[from] MirrorError),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Timezone error: {0}")]
    Timezone(#[from] TimezoneError),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Failure of one table's import
#[derive(Error, Debug)]
pub enum ImportError {
    /// Nothing was committed for this table
    #[error("Failed to load {table}: {source}")]
    Load {
        table: DataTable,
        #[source]
        source: DbError,
    },

    /// Rows were committed but the status row was not written
    #[error("Loaded {count} {table} records but failed to record provenance: {source}")]
    Provenance {
        table: DataTable,
        count: u64,
        #[source]
        source: ProvenanceError,
    },
}

#[derive(Error, Debug)]
pub enum ProvenanceError {
    #[error("Failed to read mirror commit: {0}")]
    Mirror(#[from] MirrorError),

    #[error("Failed to write import status: {0}")]
    Database(#[from] DbError),

    #[error("Record count {0} does not fit the import status column")]
    RecordCount(u64),
}
