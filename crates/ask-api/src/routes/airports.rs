//! Airport query routes

use ask_core::{CoreError, ValidationError};
use ask_db::Airport;
use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

// ==================== Request / Response Types ====================

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub airports: Vec<Airport>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct DistanceQuery {
    pub departure: Option<String>,
    pub destination: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DistanceResponse {
    pub departure_airport: Airport,
    pub destination_airport: Airport,
    pub distance_nm: f64,
}

#[derive(Debug, Deserialize)]
pub struct TimeQuery {
    pub icao: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TimeResponse {
    pub icao: String,
    pub name: String,
    pub timezone: String,
    pub local_time: String,
    pub utc_offset: String,
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ApiError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(CoreError::Validation(ValidationError::MissingParameter(name)).into()),
    }
}

// ==================== Airport Routes ====================

/// GET /api/airport/search?name=...&country=...
async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let name = required(query.name, "name")?;
    let airports = state
        .query
        .search(&name, query.country.as_deref())
        .await?;

    Ok(Json(SearchResponse {
        count: airports.len(),
        airports,
    }))
}

/// GET /api/airport/distance?departure=...&destination=...
async fn distance(
    State(state): State<AppState>,
    Query(query): Query<DistanceQuery>,
) -> Result<Json<DistanceResponse>, ApiError> {
    let departure = required(query.departure, "departure")?;
    let destination = required(query.destination, "destination")?;
    let report = state.query.distance(&departure, &destination).await?;

    Ok(Json(DistanceResponse {
        departure_airport: report.departure,
        destination_airport: report.destination,
        distance_nm: report.distance_nm,
    }))
}

/// GET /api/airport/time?icao=...
async fn time(
    State(state): State<AppState>,
    Query(query): Query<TimeQuery>,
) -> Result<Json<TimeResponse>, ApiError> {
    let icao = required(query.icao, "icao")?;
    let time = state.query.local_time(&icao).await?;

    Ok(Json(TimeResponse {
        icao: time.icao,
        name: time.name,
        timezone: time.timezone,
        local_time: time.local_time,
        utc_offset: time.utc_offset,
    }))
}

/// Create airport routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/airport/search", get(search))
        .route("/api/airport/distance", get(distance))
        .route("/api/airport/time", get(time))
}
