//! Database repository implementation

use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use crate::error::DbError;

// Submodules
mod airports;
mod countries;
mod import_status;
mod loader;

/// Database connection and operations
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Delete any existing store at `path` and create a fresh one with the full schema
    pub async fn recreate(path: &Path) -> Result<Self, DbError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => info!("Removed existing database: {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        info!("Creating database: {}", path.display());
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Open an existing store read-only for query serving
    pub async fn open(path: &Path) -> Result<Self, DbError> {
        info!("Connecting to database: {}", path.display());

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(false)
            .read_only(true);
        let pool = SqlitePool::connect_with(options).await?;
        Ok(Self { pool })
    }

    /// Create an isolated in-memory store with the full schema
    ///
    /// The pool is pinned to a single connection because every SQLite
    /// in-memory connection owns a separate database.
    pub async fn in_memory() -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Get the underlying pool for advanced usage
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close all pooled connections
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Create the replica schema
    ///
    /// Column order of `airports` and `countries` mirrors the upstream CSV
    /// headers; the bulk loader inserts positionally.
    async fn run_migrations(&self) -> Result<(), DbError> {
        info!("Running database migrations");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS airports (
                id INTEGER,
                ident TEXT,
                type TEXT,
                name TEXT,
                latitude_deg REAL,
                longitude_deg REAL,
                elevation_ft INTEGER,
                continent TEXT,
                iso_country TEXT,
                iso_region TEXT,
                municipality TEXT,
                scheduled_service TEXT,
                icao_code TEXT,
                iata_code TEXT,
                gps_code TEXT,
                local_code TEXT,
                home_link TEXT,
                wikipedia_link TEXT,
                keywords TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_airports_icao_code ON airports(icao_code COLLATE NOCASE)
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS countries (
                id INTEGER,
                code TEXT,
                name TEXT,
                continent TEXT,
                wikipedia_link TEXT,
                keywords TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS import_status (
                table_name TEXT PRIMARY KEY,
                last_import_date TEXT NOT NULL,
                git_commit_hash TEXT NOT NULL,
                git_commit_date TEXT NOT NULL,
                record_count INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Database migrations completed");
        Ok(())
    }

    /// Check whether a table exists in the schema
    pub(crate) async fn table_exists(&self, name: &str) -> Result<bool, DbError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }
}
