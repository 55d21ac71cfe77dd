//! CSV bulk loader

use std::io::ErrorKind;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use crate::error::DbError;
use crate::models::DataTable;
use crate::repository::Database;
use crate::utils::placeholders;

impl Database {
    // ==================== Bulk Load Operations ====================

    /// Replace the contents of `table` with the rows of the CSV at `csv_path`
    ///
    /// The header row only fixes the number of positional values per insert;
    /// the table's own column order applies. Every field is bound as text.
    /// The delete and all inserts share one transaction: any read or insert
    /// error drops it uncommitted, so readers never see a partial table.
    ///
    /// Returns the number of data rows inserted.
    pub async fn load_csv(&self, table: DataTable, csv_path: &Path) -> Result<u64, DbError> {
        let content = match tokio::fs::read(csv_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DbError::MissingSource(csv_path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(content.as_slice());

        let columns = reader.headers()?.len();
        if columns == 0 {
            return Err(DbError::InvalidSource {
                path: csv_path.to_path_buf(),
                reason: "missing header row".to_string(),
            });
        }
        debug!(
            "Loading {} from {} ({} columns)",
            table,
            csv_path.display(),
            columns
        );

        let insert_sql = format!(
            "INSERT INTO {} VALUES ({})",
            table.as_str(),
            placeholders(columns)
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!("DELETE FROM {}", table.as_str()))
            .execute(&mut *tx)
            .await?;

        let mut count: u64 = 0;
        let mut record = StringRecord::new();
        while reader.read_record(&mut record)? {
            let mut query = sqlx::query(&insert_sql);
            for field in record.iter() {
                query = query.bind(field.to_owned());
            }
            query.execute(&mut *tx).await?;
            count += 1;
        }

        tx.commit().await?;

        info!("Imported {} {} records", count, table);
        Ok(count)
    }

    /// Count the rows currently stored in `table`
    pub async fn count_rows(&self, table: DataTable) -> Result<i64, DbError> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table.as_str()))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[tokio::test]
    async fn test_load_two_rows_replaces_prior_contents() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::in_memory().await.unwrap();

        let first = write_csv(
            dir.path(),
            DataTable::Airports,
            AIRPORTS_HEADER,
            &[GENEVA, JFK, NO_ELEVATION],
        );
        assert_eq!(db.load_csv(DataTable::Airports, &first).await.unwrap(), 3);

        let second = write_csv(dir.path(), DataTable::Airports, AIRPORTS_HEADER, &[GENEVA, JFK]);
        let count = db.load_csv(DataTable::Airports, &second).await.unwrap();

        assert_eq!(count, 2);
        assert_eq!(db.count_rows(DataTable::Airports).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_header_only_yields_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::in_memory().await.unwrap();

        let seeded = write_csv(dir.path(), DataTable::Countries, COUNTRIES_HEADER, &[FRANCE]);
        db.load_csv(DataTable::Countries, &seeded).await.unwrap();

        let empty = write_csv(dir.path(), DataTable::Countries, COUNTRIES_HEADER, &[]);
        let count = db.load_csv(DataTable::Countries, &empty).await.unwrap();

        assert_eq!(count, 0);
        assert_eq!(db.count_rows(DataTable::Countries).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::in_memory().await.unwrap();
        let path = dir.path().join("airports.csv");

        let err = db.load_csv(DataTable::Airports, &path).await.unwrap_err();

        assert!(matches!(err, DbError::MissingSource(ref p) if p == &path));
        assert!(err.to_string().contains("airports.csv"));
    }

    #[tokio::test]
    async fn test_empty_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::in_memory().await.unwrap();
        let path = dir.path().join("countries.csv");
        std::fs::write(&path, "").unwrap();

        let err = db.load_csv(DataTable::Countries, &path).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidSource { .. }));
    }

    #[tokio::test]
    async fn test_malformed_row_rolls_back_whole_import() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::in_memory().await.unwrap();

        let good = write_csv(dir.path(), DataTable::Countries, COUNTRIES_HEADER, &[SWITZERLAND]);
        db.load_csv(DataTable::Countries, &good).await.unwrap();

        // Second data row is short one field
        let bad = write_csv(
            dir.path(),
            DataTable::Countries,
            COUNTRIES_HEADER,
            &[FRANCE, "1,\"XX\",\"Nowhere\",\"EU\",\"\""],
        );
        let err = db.load_csv(DataTable::Countries, &bad).await.unwrap_err();
        assert!(matches!(err, DbError::Csv(_)));

        // Prior contents survive untouched
        let countries = db.list_countries().await.unwrap();
        assert_eq!(countries.len(), 1);
        assert_eq!(countries[0].code, "CH");
    }

    #[tokio::test]
    async fn test_header_arity_mismatch_with_table_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::in_memory().await.unwrap();

        let good = write_csv(dir.path(), DataTable::Countries, COUNTRIES_HEADER, &[SWITZERLAND]);
        db.load_csv(DataTable::Countries, &good).await.unwrap();

        let wide = write_csv(
            dir.path(),
            DataTable::Countries,
            "\"id\",\"code\",\"name\"",
            &["1,\"XX\",\"Nowhere\""],
        );
        let err = db.load_csv(DataTable::Countries, &wide).await.unwrap_err();
        assert!(matches!(err, DbError::Query(_)));
        assert_eq!(db.count_rows(DataTable::Countries).await.unwrap(), 1);
    }
}
