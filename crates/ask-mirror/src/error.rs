//! Mirror error types

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {operation} failed in {}: {stderr}", .dir.display())]
    Git {
        operation: String,
        dir: PathBuf,
        stderr: String,
    },

    #[error("Refusing to use {} as the data directory: {reason}", .dir.display())]
    ForeignDirectory { dir: PathBuf, reason: String },

    #[error("Invalid commit metadata in {}: {reason}", .dir.display())]
    InvalidCommit { dir: PathBuf, reason: String },
}
