//! Import status (provenance) operations

use crate::error::DbError;
use crate::models::{ImportStatus, NewImportStatus};
use crate::repository::Database;

impl Database {
    // ==================== Import Status Operations ====================

    /// Insert or replace the status row of one table
    pub async fn upsert_import_status(&self, status: NewImportStatus) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO import_status
                (table_name, last_import_date, git_commit_hash, git_commit_date, record_count)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(table_name) DO UPDATE SET
                last_import_date = excluded.last_import_date,
                git_commit_hash = excluded.git_commit_hash,
                git_commit_date = excluded.git_commit_date,
                record_count = excluded.record_count
            "#,
        )
        .bind(status.table.as_str())
        .bind(status.last_import_date.to_rfc3339())
        .bind(&status.git_commit_hash)
        .bind(status.git_commit_date.to_rfc3339())
        .bind(status.record_count)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// List status rows ordered by table name
    ///
    /// A store that has never been imported into (or predates the
    /// `import_status` table) yields an empty list.
    pub async fn list_import_status(&self) -> Result<Vec<ImportStatus>, DbError> {
        if !self.table_exists("import_status").await? {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT table_name, last_import_date, git_commit_hash, git_commit_date, record_count
            FROM import_status
            ORDER BY table_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| ImportStatus::try_from(row).map_err(DbError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DataTable;
    use chrono::{TimeZone, Utc};

    fn status(table: DataTable, hash: &str, count: i64) -> NewImportStatus {
        NewImportStatus {
            table,
            last_import_date: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            git_commit_hash: hash.to_string(),
            git_commit_date: Utc.with_ymd_and_hms(2024, 4, 30, 22, 15, 0).unwrap(),
            record_count: count,
        }
    }

    #[tokio::test]
    async fn test_upsert_keeps_one_row_per_table() {
        let db = Database::in_memory().await.unwrap();

        db.upsert_import_status(status(DataTable::Airports, "aaa", 10)).await.unwrap();
        db.upsert_import_status(status(DataTable::Countries, "aaa", 2)).await.unwrap();
        db.upsert_import_status(status(DataTable::Airports, "bbb", 12)).await.unwrap();

        let rows = db.list_import_status().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].table_name, "airports");
        assert_eq!(rows[0].git_commit_hash, "bbb");
        assert_eq!(rows[0].record_count, 12);
        assert_eq!(rows[1].table_name, "countries");
        assert_eq!(
            rows[1].git_commit_date,
            Utc.with_ymd_and_hms(2024, 4, 30, 22, 15, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_never_imported_is_empty() {
        let db = Database::in_memory().await.unwrap();
        assert!(db.list_import_status().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_status_table_is_empty() {
        let db = Database::in_memory().await.unwrap();
        sqlx::query("DROP TABLE import_status")
            .execute(db.pool())
            .await
            .unwrap();

        assert!(db.list_import_status().await.unwrap().is_empty());
    }
}
