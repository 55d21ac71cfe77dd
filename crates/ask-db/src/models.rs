//! Database models

use crate::utils::parse_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use std::fmt;
use std::str::FromStr;

/// Error type for parsing models from strings
#[derive(Debug, Clone)]
pub enum ParseError {
    InvalidTable(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidTable(s) => write!(f, "Invalid data table: {}", s),
        }
    }
}

impl std::error::Error for ParseError {}

/// Logical tables replicated from the upstream dataset
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DataTable {
    Airports,
    Countries,
}

impl DataTable {
    /// Import order used by the sync pipeline
    pub const ALL: [DataTable; 2] = [DataTable::Airports, DataTable::Countries];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataTable::Airports => "airports",
            DataTable::Countries => "countries",
        }
    }

    /// Name of the upstream CSV snapshot feeding this table
    pub fn csv_file_name(&self) -> &'static str {
        match self {
            DataTable::Airports => "airports.csv",
            DataTable::Countries => "countries.csv",
        }
    }
}

impl fmt::Display for DataTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataTable {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "airports" => Ok(DataTable::Airports),
            "countries" => Ok(DataTable::Countries),
            _ => Err(ParseError::InvalidTable(s.to_string())),
        }
    }
}

/// Airport record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub id: i64,
    pub ident: String,
    #[serde(rename = "type")]
    pub airport_type: String,
    pub name: String,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    /// Blank upstream values read back as 0
    pub elevation_ft: i64,
    pub continent: String,
    pub iso_country: String,
    pub iso_region: String,
    pub municipality: String,
    pub scheduled_service: String,
    pub icao_code: String,
    pub iata_code: String,
    pub gps_code: String,
    pub local_code: String,
    pub home_link: String,
    pub wikipedia_link: String,
    pub keywords: String,
}

/// Country record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub continent: String,
    pub wikipedia_link: String,
    pub keywords: String,
}

/// Provenance of the last import of one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportStatus {
    pub table_name: String,
    pub last_import_date: DateTime<Utc>,
    pub git_commit_hash: String,
    pub git_commit_date: DateTime<Utc>,
    pub record_count: i64,
}

/// New import status (for upsert)
#[derive(Debug, Clone)]
pub struct NewImportStatus {
    pub table: DataTable,
    pub last_import_date: DateTime<Utc>,
    pub git_commit_hash: String,
    pub git_commit_date: DateTime<Utc>,
    pub record_count: i64,
}

// ==================== TryFrom Implementations ====================

/// Read a text column, treating NULL as empty
fn text(row: &SqliteRow, column: &str) -> Result<String, sqlx::Error> {
    Ok(row
        .try_get::<Option<String>, _>(column)?
        .unwrap_or_default())
}

fn datetime(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    parse_datetime(&raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

impl TryFrom<&SqliteRow> for Airport {
    type Error = sqlx::Error;

    fn try_from(row: &SqliteRow) -> Result<Self, Self::Error> {
        Ok(Airport {
            id: row.try_get("id")?,
            ident: text(row, "ident")?,
            airport_type: text(row, "type")?,
            name: text(row, "name")?,
            latitude_deg: row.try_get("latitude_deg")?,
            longitude_deg: row.try_get("longitude_deg")?,
            elevation_ft: row.try_get("elevation_ft")?,
            continent: text(row, "continent")?,
            iso_country: text(row, "iso_country")?,
            iso_region: text(row, "iso_region")?,
            municipality: text(row, "municipality")?,
            scheduled_service: text(row, "scheduled_service")?,
            icao_code: text(row, "icao_code")?,
            iata_code: text(row, "iata_code")?,
            gps_code: text(row, "gps_code")?,
            local_code: text(row, "local_code")?,
            home_link: text(row, "home_link")?,
            wikipedia_link: text(row, "wikipedia_link")?,
            keywords: text(row, "keywords")?,
        })
    }
}

impl TryFrom<&SqliteRow> for Country {
    type Error = sqlx::Error;

    fn try_from(row: &SqliteRow) -> Result<Self, Self::Error> {
        Ok(Country {
            id: row.try_get("id")?,
            code: text(row, "code")?,
            name: text(row, "name")?,
            continent: text(row, "continent")?,
            wikipedia_link: text(row, "wikipedia_link")?,
            keywords: text(row, "keywords")?,
        })
    }
}

impl TryFrom<&SqliteRow> for ImportStatus {
    type Error = sqlx::Error;

    fn try_from(row: &SqliteRow) -> Result<Self, Self::Error> {
        Ok(ImportStatus {
            table_name: row.try_get("table_name")?,
            last_import_date: datetime(row, "last_import_date")?,
            git_commit_hash: row.try_get("git_commit_hash")?,
            git_commit_date: datetime(row, "git_commit_date")?,
            record_count: row.try_get("record_count")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_table_round_trip() {
        for table in DataTable::ALL {
            assert_eq!(DataTable::from_str(table.as_str()).unwrap(), table);
        }
        assert!(DataTable::from_str("import_status").is_err());
    }

    #[test]
    fn test_csv_file_names() {
        assert_eq!(DataTable::Airports.csv_file_name(), "airports.csv");
        assert_eq!(DataTable::Countries.csv_file_name(), "countries.csv");
    }

    #[test]
    fn test_airport_type_serializes_as_type() {
        let airport = Airport {
            id: 1,
            ident: "LSGG".to_string(),
            airport_type: "large_airport".to_string(),
            name: "Geneva International Airport".to_string(),
            latitude_deg: 46.238,
            longitude_deg: 6.109,
            elevation_ft: 1411,
            continent: "EU".to_string(),
            iso_country: "CH".to_string(),
            iso_region: "CH-GE".to_string(),
            municipality: "Geneva".to_string(),
            scheduled_service: "yes".to_string(),
            icao_code: "LSGG".to_string(),
            iata_code: "GVA".to_string(),
            gps_code: "LSGG".to_string(),
            local_code: String::new(),
            home_link: String::new(),
            wikipedia_link: String::new(),
            keywords: String::new(),
        };

        let json = serde_json::to_value(&airport).unwrap();
        assert_eq!(json["type"], "large_airport");
        assert!(json.get("airport_type").is_none());
    }
}
