//! Country queries

use crate::error::DbError;
use crate::models::Country;
use crate::repository::Database;

impl Database {
    // ==================== Country Operations ====================

    /// List all countries ordered by name
    pub async fn list_countries(&self) -> Result<Vec<Country>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT CAST(id AS INTEGER) AS id, code, name, continent, wikipedia_link, keywords
            FROM countries
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Country::try_from(row).map_err(DbError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::seeded_database;

    #[tokio::test]
    async fn test_list_countries_ordered_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let db = seeded_database(dir.path()).await;

        let countries = db.list_countries().await.unwrap();
        let names: Vec<&str> = countries.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["France", "Switzerland"]);
        assert_eq!(countries[1].id, 302755);
        assert_eq!(countries[1].keywords, "Swiss");
    }

    #[tokio::test]
    async fn test_list_countries_empty_store() {
        let db = Database::in_memory().await.unwrap();
        assert!(db.list_countries().await.unwrap().is_empty());
    }
}
