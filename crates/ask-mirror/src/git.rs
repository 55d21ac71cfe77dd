//! Git-backed mirror

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::MirrorError;
use crate::source::{CommitInfo, MirrorSnapshot, MirrorSource};

/// OurAirports data repository
pub const DEFAULT_UPSTREAM_URL: &str = "https://github.com/davidmegginson/ourairports-data";

/// Working copy of an upstream git repository under `<root>/<data>`
#[derive(Debug, Clone)]
pub struct GitMirror {
    root: PathBuf,
    data_dir: PathBuf,
    url: String,
    git: String,
}

impl GitMirror {
    pub fn new(root: impl Into<PathBuf>, data: impl AsRef<Path>, url: impl Into<String>) -> Self {
        let root = root.into();
        let data_dir = root.join(data);
        Self {
            root,
            data_dir,
            url: url.into(),
            git: "git".to_string(),
        }
    }

    /// Use a specific git executable
    pub fn with_git_binary(mut self, git: impl Into<String>) -> Self {
        self.git = git.into();
        self
    }

    /// Create the root directory and classify the data directory
    ///
    /// Returns true when the data directory holds a working copy to pull
    /// into, false when a fresh clone is needed. A clone interrupted before
    /// its first checkout (a `.git` of this upstream with no commit yet) is
    /// removed. Any other non-empty directory is left untouched and
    /// reported as an error.
    async fn prepare(&self) -> Result<bool, MirrorError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| self.io_error(&self.root, source))?;

        if tokio::fs::try_exists(self.data_dir.join(".git"))
            .await
            .map_err(|source| self.io_error(&self.data_dir, source))?
        {
            if self
                .try_git(&["rev-parse", "--verify", "--quiet", "HEAD"])
                .await?
                .is_some()
            {
                return Ok(true);
            }

            let origin = self
                .try_git(&["config", "--get", "remote.origin.url"])
                .await?;
            if origin.as_deref().map(str::trim) != Some(self.url.as_str()) {
                return Err(MirrorError::ForeignDirectory {
                    dir: self.data_dir.clone(),
                    reason: "git repository without commits that does not track the upstream"
                        .to_string(),
                });
            }

            warn!(
                "Removing interrupted clone at {}",
                self.data_dir.display()
            );
            tokio::fs::remove_dir_all(&self.data_dir)
                .await
                .map_err(|source| self.io_error(&self.data_dir, source))?;
            return Ok(false);
        }

        match tokio::fs::read_dir(&self.data_dir).await {
            Ok(mut entries) => {
                let has_entries = entries
                    .next_entry()
                    .await
                    .map_err(|source| self.io_error(&self.data_dir, source))?
                    .is_some();
                if has_entries {
                    return Err(MirrorError::ForeignDirectory {
                        dir: self.data_dir.clone(),
                        reason: "not empty and not a git working copy".to_string(),
                    });
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(source) => return Err(self.io_error(&self.data_dir, source)),
        }

        Ok(false)
    }

    async fn clone_upstream(&self) -> Result<(), MirrorError> {
        info!(
            "Cloning {} into {}",
            self.url,
            self.data_dir.display()
        );
        let mut command = Command::new(&self.git);
        command
            .args(["clone", "--depth", "1", "--quiet"])
            .arg(&self.url)
            .arg(&self.data_dir);
        self.run("clone", command).await?;
        Ok(())
    }

    async fn pull(&self) -> Result<(), MirrorError> {
        info!("Pulling latest changes in {}", self.data_dir.display());
        let mut command = self.command_in_data_dir();
        command.args(["pull", "--ff-only", "--quiet", "origin"]);
        self.run("pull", command).await?;
        Ok(())
    }

    fn command_in_data_dir(&self) -> Command {
        let mut command = Command::new(&self.git);
        command.arg("-C").arg(&self.data_dir);
        command
    }

    /// Run a git command, returning its stdout on success
    async fn run(&self, operation: &str, mut command: Command) -> Result<String, MirrorError> {
        let output = command
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .await
            .map_err(|source| MirrorError::Spawn {
                program: self.git.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(MirrorError::Git {
                operation: operation.to_string(),
                dir: self.data_dir.clone(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!("git {} succeeded in {}", operation, self.data_dir.display());
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run a read-only git query in the data directory
    ///
    /// Returns its stdout, or `None` when git exits non-zero.
    async fn try_git(&self, args: &[&str]) -> Result<Option<String>, MirrorError> {
        let output = self
            .command_in_data_dir()
            .args(args)
            .output()
            .await
            .map_err(|source| MirrorError::Spawn {
                program: self.git.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
        } else {
            Ok(None)
        }
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> MirrorError {
        MirrorError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[async_trait]
impl MirrorSource for GitMirror {
    async fn ensure_current(&self) -> Result<MirrorSnapshot, MirrorError> {
        if self.prepare().await? {
            self.pull().await?;
        } else {
            self.clone_upstream().await?;
        }

        let commit = self.head_commit().await?;
        info!(
            "Data directory {} at commit {}",
            self.data_dir.display(),
            commit.hash
        );
        Ok(MirrorSnapshot {
            path: self.data_dir.clone(),
            commit,
        })
    }

    async fn head_commit(&self) -> Result<CommitInfo, MirrorError> {
        let mut command = self.command_in_data_dir();
        command.args(["log", "-1", "--format=%H%n%aI"]);
        let stdout = self.run("log", command).await?;
        parse_commit(&stdout).map_err(|reason| MirrorError::InvalidCommit {
            dir: self.data_dir.clone(),
            reason,
        })
    }
}

/// Parse `git log --format=%H%n%aI` output
fn parse_commit(output: &str) -> Result<CommitInfo, String> {
    let mut lines = output.lines().map(str::trim);

    let hash = match lines.next() {
        Some(hash) if !hash.is_empty() => hash.to_string(),
        _ => return Err("missing commit hash".to_string()),
    };
    let date = lines
        .next()
        .ok_or_else(|| "missing author date".to_string())?;
    let authored_at = DateTime::parse_from_rfc3339(date)
        .map_err(|e| format!("invalid author date {:?}: {}", date, e))?
        .with_timezone(&Utc);

    Ok(CommitInfo { hash, authored_at })
}
