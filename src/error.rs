use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Request-level failure taxonomy. Every variant maps onto exactly one HTTP
/// status; no failure is retried.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input, rejected before touching the store.
    #[error("{0}")]
    Validation(&'static str),

    /// No row matched the identifier or login id.
    #[error("{0}")]
    NotFound(&'static str),

    /// Credential mismatch.
    #[error("{0}")]
    Unauthorized(&'static str),

    /// Store failure, message passed through verbatim.
    #[error(transparent)]
    Store(anyhow::Error),

    /// Hash derivation or other non-store internal failure.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
