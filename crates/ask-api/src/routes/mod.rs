//! API routes

mod airports;
mod countries;
mod health;
mod import_status;

use axum::{Router, extract::State, http::Uri, routing::get};
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::{AppState, MetricsHandle};

/// JSON 404 for unknown paths
async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

/// GET /metrics - Prometheus text exposition
async fn render_metrics(State(handle): State<Arc<MetricsHandle>>) -> String {
    handle.render()
}

/// Create the main router
pub fn create_router(state: AppState, metrics_handle: Option<Arc<MetricsHandle>>) -> Router {
    let mut router = Router::new()
        .merge(health::routes())
        .merge(airports::routes())
        .merge(countries::routes())
        .merge(import_status::routes())
        .with_state(state);

    if let Some(handle) = metrics_handle {
        router = router.merge(
            Router::new()
                .route("/metrics", get(render_metrics))
                .with_state(handle),
        );
    }

    router.fallback(not_found)
}
