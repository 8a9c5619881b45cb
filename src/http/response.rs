//! Error responses.
//!
//! Probe failures are not errors at this layer: they are reported inline in
//! the JSON body. Only request-level problems map to a non-2xx status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::config::loader::ENV_API_KEY;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Source A has no API key; fatal for this request only.
    #[error("{} not configured", ENV_API_KEY)]
    MissingApiKey,

    #[error("too many identifiers: {count} (max {max})")]
    TooManyIdentifiers { count: usize, max: usize },

    #[error("identifier must not be empty")]
    EmptyIdentifier,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::TooManyIdentifiers { .. } | ApiError::EmptyIdentifier => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
