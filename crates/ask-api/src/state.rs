//! Application state

use ask_core::QueryService;
use std::sync::Arc;

/// Prometheus recorder handle used to render `/metrics`
pub type MetricsHandle = metrics_exporter_prometheus::PrometheusHandle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub query: Arc<QueryService>,
}

impl AppState {
    pub fn new(query: Arc<QueryService>) -> Self {
        Self { query }
    }
}
