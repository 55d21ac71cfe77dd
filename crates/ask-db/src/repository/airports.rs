//! Airport queries

use crate::error::DbError;
use crate::models::Airport;
use crate::repository::Database;

/// Projection shared by every airport query
///
/// Values are stored as loaded from CSV; numeric columns are cast here so
/// blank or malformed upstream fields read back as zero instead of failing.
const AIRPORT_COLUMNS: &str = r#"
    CAST(id AS INTEGER) AS id, ident, type, name,
    CAST(latitude_deg AS REAL) AS latitude_deg,
    CAST(longitude_deg AS REAL) AS longitude_deg,
    CAST(COALESCE(NULLIF(elevation_ft, ''), 0) AS INTEGER) AS elevation_ft,
    continent, iso_country, iso_region, municipality, scheduled_service,
    icao_code, iata_code, gps_code, local_code, home_link, wikipedia_link, keywords
"#;

impl Database {
    // ==================== Airport Operations ====================

    /// Search airports whose name contains `name`, case-insensitively
    ///
    /// `country`, when given, restricts results to that ISO country code
    /// (case-insensitive). Callers validate both values beforehand; they are
    /// only ever bound, never interpolated.
    pub async fn search_airports(
        &self,
        name: &str,
        country: Option<&str>,
    ) -> Result<Vec<Airport>, DbError> {
        let mut sql = format!(
            "SELECT {} FROM airports WHERE LOWER(name) LIKE LOWER(?)",
            AIRPORT_COLUMNS
        );
        if country.is_some() {
            sql.push_str(" AND LOWER(iso_country) = LOWER(?)");
        }

        let mut query = sqlx::query(&sql).bind(format!("%{}%", name));
        if let Some(country) = country {
            query = query.bind(country);
        }

        let rows = query.fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| Airport::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Get an airport by ICAO code (case-insensitive)
    pub async fn get_airport_by_icao(&self, icao: &str) -> Result<Option<Airport>, DbError> {
        let sql = format!(
            "SELECT {} FROM airports WHERE icao_code = ? COLLATE NOCASE LIMIT 1",
            AIRPORT_COLUMNS
        );
        let result = sqlx::query(&sql)
            .bind(icao)
            .fetch_optional(&self.pool)
            .await?;

        result
            .map(|row| Airport::try_from(&row).map_err(DbError::from))
            .transpose()
    }
}
