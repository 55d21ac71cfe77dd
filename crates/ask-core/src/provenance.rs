//! Provenance tracking for imported tables

use std::sync::Arc;

use ask_db::{DataTable, Database, NewImportStatus};
use ask_mirror::MirrorSource;
use chrono::Utc;
use tracing::info;

use crate::error::ProvenanceError;

/// Records which upstream commit each table was last loaded from
pub struct ProvenanceTracker {
    db: Database,
    mirror: Arc<dyn MirrorSource>,
}

impl ProvenanceTracker {
    pub fn new(db: Database, mirror: Arc<dyn MirrorSource>) -> Self {
        Self { db, mirror }
    }

    /// Stamp `table` with the mirror's current commit and the current time
    ///
    /// Call only after the table's load has committed.
    pub async fn record(
        &self,
        table: DataTable,
        record_count: u64,
    ) -> Result<NewImportStatus, ProvenanceError> {
        let record_count_column =
            i64::try_from(record_count).map_err(|_| ProvenanceError::RecordCount(record_count))?;
        let commit = self.mirror.head_commit().await?;

        let status = NewImportStatus {
            table,
            last_import_date: Utc::now(),
            git_commit_hash: commit.hash,
            git_commit_date: commit.authored_at,
            record_count: record_count_column,
        };
        self.db.upsert_import_status(status.clone()).await?;

        info!(
            "Recorded import of {} {} records at commit {}",
            record_count, table, status.git_commit_hash
        );
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ask_mirror::test_support::{StaticMirror, UnreachableMirror, sample_commit};

    #[tokio::test]
    async fn test_record_upserts_status() {
        let db = Database::in_memory().await.unwrap();
        let tracker = ProvenanceTracker::new(db.clone(), Arc::new(StaticMirror::at("/data")));

        let before = Utc::now();
        tracker.record(DataTable::Countries, 2).await.unwrap();
        tracker.record(DataTable::Countries, 3).await.unwrap();

        let rows = db.list_import_status().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].table_name, "countries");
        assert_eq!(rows[0].record_count, 3);
        assert_eq!(rows[0].git_commit_hash, sample_commit().hash);
        assert_eq!(rows[0].git_commit_date, sample_commit().authored_at);
        // Stored with second precision or better
        assert!(rows[0].last_import_date.timestamp() >= before.timestamp());
    }

    #[tokio::test]
    async fn test_mirror_failure_writes_nothing() {
        let db = Database::in_memory().await.unwrap();
        let tracker = ProvenanceTracker::new(
            db.clone(),
            Arc::new(UnreachableMirror {
                dir: "/data".into(),
            }),
        );

        let err = tracker.record(DataTable::Airports, 10).await.unwrap_err();
        assert!(matches!(err, ProvenanceError::Mirror(_)));
        assert!(db.list_import_status().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_record_count_is_rejected() {
        let db = Database::in_memory().await.unwrap();
        let tracker = ProvenanceTracker::new(db.clone(), Arc::new(StaticMirror::at("/data")));

        let err = tracker.record(DataTable::Airports, u64::MAX).await.unwrap_err();
        assert!(matches!(err, ProvenanceError::RecordCount(u64::MAX)));
        assert!(db.list_import_status().await.unwrap().is_empty());
    }
}
