//! API error types with HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// API-level error type that maps to HTTP responses.
///
/// Clients only distinguish success from failure, so responses carry the
/// status and a plain-text reason rather than a structured body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body could not be read as JSON.
    #[error("Malformed request body: {0}")]
    MalformedBody(#[from] JsonRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MalformedBody(rejection) => {
                tracing::warn!(
                    status = rejection.status().as_u16(),
                    reason = %rejection.body_text(),
                    "rejected malformed study data"
                );
                (rejection.status(), rejection.body_text()).into_response()
            }
        }
    }
}
