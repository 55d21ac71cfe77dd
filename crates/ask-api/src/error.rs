//! API error types

use ask_core::CoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl ApiError {
    /// Status, machine-readable code and client-facing message
    ///
    /// Server-side failures get a fixed message; their detail is logged.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::Core(e) => match e {
                CoreError::Validation(v) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", v.to_string()),
                CoreError::NotFound(msg) => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("Not found: {}", msg),
                ),
                CoreError::Timezone(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "TIMEZONE_ERROR",
                    "Unable to determine the airport timezone".to_string(),
                ),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                ),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = axum::Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
