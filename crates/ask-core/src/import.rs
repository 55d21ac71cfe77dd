//! Import pipeline: mirror sync, bulk load, provenance

use std::sync::Arc;
use std::time::{Duration, Instant};

use ask_db::{DataTable, Database};
use ask_mirror::{CommitInfo, MirrorSnapshot, MirrorSource};
use tracing::{info, warn};

use crate::error::{CoreError, ImportError};
use crate::provenance::ProvenanceTracker;

/// Outcome of one table's import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableImport {
    pub table: DataTable,
    pub record_count: u64,
}

/// Outcome of a full import run
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub commit: CommitInfo,
    pub tables: Vec<TableImport>,
    pub elapsed: Duration,
}

/// Runs the full sync: bring the mirror current, then reload every table
pub struct ImportService {
    db: Database,
    mirror: Arc<dyn MirrorSource>,
    provenance: ProvenanceTracker,
}

impl ImportService {
    pub fn new(db: Database, mirror: Arc<dyn MirrorSource>) -> Self {
        let provenance = ProvenanceTracker::new(db.clone(), mirror.clone());
        Self {
            db,
            mirror,
            provenance,
        }
    }

    /// Sync the mirror and import airports then countries
    ///
    /// Stops at the first failure. Tables imported before it stay committed
    /// with their status rows.
    pub async fn run(&self) -> Result<ImportReport, CoreError> {
        let snapshot = self.mirror.ensure_current().await?;
        self.import_snapshot(&snapshot).await
    }

    /// Import every table from an already synced snapshot
    pub async fn import_snapshot(
        &self,
        snapshot: &MirrorSnapshot,
    ) -> Result<ImportReport, CoreError> {
        let started = Instant::now();
        info!(
            "Importing from {} at commit {}",
            snapshot.path.display(),
            snapshot.commit.hash
        );

        let mut tables = Vec::with_capacity(DataTable::ALL.len());
        for table in DataTable::ALL {
            let csv_path = snapshot.path.join(table.csv_file_name());

            let record_count = self
                .db
                .load_csv(table, &csv_path)
                .await
                .map_err(|source| ImportError::Load { table, source })?;

            if let Err(source) = self.provenance.record(table, record_count).await {
                warn!("{} data committed without provenance", table);
                return Err(ImportError::Provenance {
                    table,
                    count: record_count,
                    source,
                }
                .into());
            }

            tables.push(TableImport {
                table,
                record_count,
            });
        }

        let elapsed = started.elapsed();
        info!("Import completed in {:?}", elapsed);

        Ok(ImportReport {
            commit: snapshot.commit.clone(),
            tables,
            elapsed,
        })
    }
}
