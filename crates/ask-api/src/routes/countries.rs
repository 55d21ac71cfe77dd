//! Country routes

use ask_db::Country;
use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CountriesResponse {
    pub countries: Vec<Country>,
    pub count: usize,
}

/// GET /api/country
async fn list_countries(
    State(state): State<AppState>,
) -> Result<Json<CountriesResponse>, ApiError> {
    let countries = state.query.list_countries().await?;
    Ok(Json(CountriesResponse {
        count: countries.len(),
        countries,
    }))
}

/// Create country routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/country", get(list_countries))
}
