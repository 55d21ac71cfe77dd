//! Read-only query engine

use std::sync::Arc;

use ask_db::{Airport, Country, Database, ImportStatus};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::CoreError;
use crate::geo::{Coordinates, haversine_nm};
use crate::timezone::{TimezoneResolver, local_time_at};
use crate::validation::{validate_country, validate_icao, validate_name};

/// Distance between two airports
#[derive(Debug, Clone)]
pub struct DistanceReport {
    pub departure: Airport,
    pub destination: Airport,
    pub distance_nm: f64,
}

/// Current local time at an airport
#[derive(Debug, Clone)]
pub struct AirportTime {
    pub icao: String,
    pub name: String,
    pub timezone: String,
    pub local_time: String,
    pub utc_offset: String,
}

fn record_query(operation: &'static str) {
    metrics::counter!("ask_queries_total", "operation" => operation).increment(1);
}

/// Query service over the loaded replica
pub struct QueryService {
    db: Database,
    resolver: Arc<dyn TimezoneResolver>,
}

impl QueryService {
    pub fn new(db: Database, resolver: Arc<dyn TimezoneResolver>) -> Self {
        Self { db, resolver }
    }

    // ==================== Airport Operations ====================

    /// Case-insensitive substring search on airport names
    pub async fn search(
        &self,
        name: &str,
        country: Option<&str>,
    ) -> Result<Vec<Airport>, CoreError> {
        validate_name(name)?;
        let country = validate_country(country)?;
        record_query("search");

        debug!("Searching airports: name={:?} country={:?}", name, country);
        Ok(self.db.search_airports(name, country).await?)
    }

    /// Look up one airport by ICAO code, any case
    pub async fn airport_by_icao(&self, code: &str) -> Result<Airport, CoreError> {
        validate_icao(code)?;
        record_query("lookup");

        self.find_airport(code).await
    }

    async fn find_airport(&self, code: &str) -> Result<Airport, CoreError> {
        self.db
            .get_airport_by_icao(code)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("airport {}", code.to_uppercase())))
    }

    /// Great-circle distance between two airports in nautical miles
    pub async fn distance(
        &self,
        departure: &str,
        destination: &str,
    ) -> Result<DistanceReport, CoreError> {
        validate_icao(departure)?;
        validate_icao(destination)?;
        record_query("distance");

        let departure = self.find_airport(departure).await?;
        let destination = self.find_airport(destination).await?;
        let distance_nm = haversine_nm(coordinates(&departure), coordinates(&destination));

        Ok(DistanceReport {
            departure,
            destination,
            distance_nm,
        })
    }

    /// Current local time at an airport
    pub async fn local_time(&self, code: &str) -> Result<AirportTime, CoreError> {
        self.local_time_at(code, Utc::now()).await
    }

    /// Local time at an airport for a given instant
    pub async fn local_time_at(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<AirportTime, CoreError> {
        validate_icao(code)?;
        record_query("time");

        let airport = self.find_airport(code).await?;
        let local = local_time_at(
            self.resolver.as_ref(),
            airport.latitude_deg,
            airport.longitude_deg,
            now,
        )?;

        Ok(AirportTime {
            icao: airport.icao_code,
            name: airport.name,
            timezone: local.zone,
            local_time: local.local_time,
            utc_offset: local.utc_offset,
        })
    }

    // ==================== Reference Data ====================

    pub async fn list_countries(&self) -> Result<Vec<Country>, CoreError> {
        record_query("countries");
        Ok(self.db.list_countries().await?)
    }

    /// Provenance of every imported table; empty before the first import
    pub async fn import_status(&self) -> Result<Vec<ImportStatus>, CoreError> {
        record_query("import_status");
        Ok(self.db.list_import_status().await?)
    }
}

fn coordinates(airport: &Airport) -> Coordinates {
    Coordinates::new(airport.latitude_deg, airport.longitude_deg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;
    use ask_db::test_support::seeded_database;
    use chrono::TimeZone;

    /// Resolver with a fixed answer, so tests avoid decoding the tzf dataset
    struct FixedResolver(Option<&'static str>);

    impl TimezoneResolver for FixedResolver {
        fn zone_name(&self, _latitude: f64, _longitude: f64) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    async fn service(dir: &std::path::Path, zone: Option<&'static str>) -> QueryService {
        let db = seeded_database(dir).await;
        QueryService::new(db, Arc::new(FixedResolver(zone)))
    }

    #[tokio::test]
    async fn test_search_geneva_with_country_filter() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path(), None).await;

        let all = service.search("Geneva", None).await.unwrap();
        assert!(all.iter().any(|a| a.icao_code == "LSGG"));

        let swiss = service.search("Geneva", Some("CH")).await.unwrap();
        assert_eq!(swiss.len(), 1);

        let french = service.search("Geneva", Some("fr")).await.unwrap();
        assert!(french.is_empty());

        // Empty country means no filter
        let unfiltered = service.search("Geneva", Some("")).await.unwrap();
        assert_eq!(unfiltered.len(), all.len());
    }

    #[tokio::test]
    async fn test_search_without_match_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path(), None).await;

        assert!(service.search("Atlantis", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_search_input_rejected_before_query() {
        let db = Database::in_memory().await.unwrap();
        // Any query against a closed pool fails with a storage error
        db.close().await;
        let service = QueryService::new(db, Arc::new(FixedResolver(None)));

        let err = service.search("Gen%", None).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::InvalidName(_))));

        let err = service.search("Geneva", Some("C-H")).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::InvalidCountry(_))));

        let err = service.search("", None).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::MissingParameter("name"))
        ));
    }

    #[tokio::test]
    async fn test_airport_by_icao() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path(), None).await;

        let airport = service.airport_by_icao("lsgg").await.unwrap();
        assert_eq!(airport.name, "Geneva International Airport");

        let err = service.airport_by_icao("ZZZZ").await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));

        let err = service.airport_by_icao("LSG").await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::InvalidIcao(_))));
    }

    #[tokio::test]
    async fn test_distance() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path(), None).await;

        let report = service.distance("LSGG", "kjfk").await.unwrap();
        assert_eq!(report.departure.icao_code, "LSGG");
        assert_eq!(report.destination.icao_code, "KJFK");
        let expected = haversine_nm(
            Coordinates::new(46.23809814453125, 6.108950138092041),
            Coordinates::new(40.639447, -73.779317),
        );
        assert!((report.distance_nm - expected).abs() < 1e-9);

        let back = service.distance("KJFK", "LSGG").await.unwrap();
        assert!((back.distance_nm - report.distance_nm).abs() < 1e-9);

        let same = service.distance("LSGG", "LSGG").await.unwrap();
        assert_eq!(same.distance_nm, 0.0);

        let err = service.distance("LSGG", "ZZZZ").await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));

        let err = service.distance("LSGG", "12AB").await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_local_time() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path(), Some("Europe/Zurich")).await;
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();

        let time = service.local_time_at("lsgg", now).await.unwrap();
        assert_eq!(time.icao, "LSGG");
        assert_eq!(time.name, "Geneva International Airport");
        assert_eq!(time.timezone, "Europe/Zurich");
        assert_eq!(time.local_time, "2024-07-01T14:00:00+02:00");
        assert_eq!(time.utc_offset, "+02:00");
    }

    #[tokio::test]
    async fn test_local_time_unresolved_zone() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path(), None).await;

        let err = service.local_time("LSGG").await.unwrap_err();
        assert!(matches!(err, CoreError::Timezone(_)));
    }

    #[tokio::test]
    async fn test_reference_data() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path(), None).await;

        let countries = service.list_countries().await.unwrap();
        assert_eq!(countries.len(), 2);
        assert_eq!(countries[0].code, "FR");

        assert!(service.import_status().await.unwrap().is_empty());
    }
}
