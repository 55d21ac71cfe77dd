//! Mirror source abstraction

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::MirrorError;

/// Commit the working copy currently sits on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub hash: String,
    pub authored_at: DateTime<Utc>,
}

/// A current working copy and its head commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorSnapshot {
    /// Directory holding the upstream CSV files
    pub path: PathBuf,
    pub commit: CommitInfo,
}

/// Source of upstream CSV snapshots
#[async_trait]
pub trait MirrorSource: Send + Sync {
    /// Bring the working copy up to date with upstream
    ///
    /// Failures are returned as-is; nothing is retried.
    async fn ensure_current(&self) -> Result<MirrorSnapshot, MirrorError>;

    /// Read the commit the working copy sits on
    async fn head_commit(&self) -> Result<CommitInfo, MirrorError>;
}
