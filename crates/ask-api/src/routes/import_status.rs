//! Import provenance routes

use ask_db::ImportStatus;
use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ImportStatusResponse {
    pub tables: Vec<ImportStatus>,
}

/// GET /api/import/status
async fn import_status(
    State(state): State<AppState>,
) -> Result<Json<ImportStatusResponse>, ApiError> {
    let tables = state.query.import_status().await?;
    Ok(Json(ImportStatusResponse { tables }))
}

/// Create import status routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/import/status", get(import_status))
}
