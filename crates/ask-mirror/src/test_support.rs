//! Mirror doubles for tests

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::error::MirrorError;
use crate::source::{CommitInfo, MirrorSnapshot, MirrorSource};

/// Serves a fixed directory at a fixed commit
#[derive(Debug, Clone)]
pub struct StaticMirror {
    path: PathBuf,
    commit: CommitInfo,
    syncs: Arc<AtomicUsize>,
}

impl StaticMirror {
    pub fn new(path: impl Into<PathBuf>, commit: CommitInfo) -> Self {
        Self {
            path: path.into(),
            commit,
            syncs: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Static mirror at [`sample_commit`]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self::new(path, sample_commit())
    }

    /// Number of `ensure_current` calls so far
    pub fn syncs(&self) -> usize {
        self.syncs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MirrorSource for StaticMirror {
    async fn ensure_current(&self) -> Result<MirrorSnapshot, MirrorError> {
        self.syncs.fetch_add(1, Ordering::SeqCst);
        Ok(MirrorSnapshot {
            path: self.path.clone(),
            commit: self.commit.clone(),
        })
    }

    async fn head_commit(&self) -> Result<CommitInfo, MirrorError> {
        Ok(self.commit.clone())
    }
}

/// Fails every call the way an unreachable upstream would
#[derive(Debug, Clone)]
pub struct UnreachableMirror {
    pub dir: PathBuf,
}

#[async_trait]
impl MirrorSource for UnreachableMirror {
    async fn ensure_current(&self) -> Result<MirrorSnapshot, MirrorError> {
        Err(MirrorError::Git {
            operation: "clone".to_string(),
            dir: self.dir.clone(),
            stderr: "fatal: unable to access upstream".to_string(),
        })
    }

    async fn head_commit(&self) -> Result<CommitInfo, MirrorError> {
        Err(MirrorError::Git {
            operation: "log".to_string(),
            dir: self.dir.clone(),
            stderr: "fatal: not a git repository".to_string(),
        })
    }
}

/// Syncs fine but cannot read its head commit afterwards
#[derive(Debug, Clone)]
pub struct HeadlessMirror {
    pub path: PathBuf,
}

#[async_trait]
impl MirrorSource for HeadlessMirror {
    async fn ensure_current(&self) -> Result<MirrorSnapshot, MirrorError> {
        Ok(MirrorSnapshot {
            path: self.path.clone(),
            commit: sample_commit(),
        })
    }

    async fn head_commit(&self) -> Result<CommitInfo, MirrorError> {
        Err(MirrorError::Git {
            operation: "log".to_string(),
            dir: self.path.clone(),
            stderr: "fatal: your current branch does not have any commits yet".to_string(),
        })
    }
}

pub fn sample_commit() -> CommitInfo {
    CommitInfo {
        hash: "4f1c2d3e5a6b7c8d9e0f1a2b3c4d5e6f7a8b9c0d".to_string(),
        authored_at: Utc
            .with_ymd_and_hms(2024, 4, 30, 22, 15, 0)
            .single()
            .unwrap_or_default(),
    }
}
