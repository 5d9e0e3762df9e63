//! Error types for relay-server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use relay_types::ValidationError;

/// Startup and runtime errors of the relay process.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned to HTTP clients.
///
/// Every variant renders as a plain-text body. `NotFound` is used for ids
/// that never existed, were already claimed, or are still pending.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request body is not valid metadata JSON.
    #[error("{0}")]
    InvalidJson(String),

    /// Metadata failed a creation rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No file with that id is available for this operation.
    #[error("404 page not found")]
    NotFound,

    /// A body chunk cannot hold nonce and tag.
    #[error("Invalid chunk")]
    InvalidChunk,

    /// Uploaded data is larger than the declared size.
    #[error("Data exceeded expected file size")]
    SizeExceeded,

    /// Uploaded data is smaller than the declared size.
    #[error("Data smaller than expected file size")]
    SizeShort,

    /// The server is shutting down.
    #[error("Upload cancelled")]
    Cancelled,

    /// The request body could not be read.
    #[error("Failed to read request body")]
    BodyRead(String),

    /// Unexpected server-side failure.
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(detail) => tracing::error!("Internal error: {}", detail),
            ApiError::BodyRead(detail) => tracing::warn!("Body read failed: {}", detail),
            _ => {}
        }
        (self.status(), self.to_string()).into_response()
    }
}

/// Result type alias for relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::InvalidChunk.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Cancelled.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_message_passes_through() {
        let err: ApiError = ValidationError::InvalidSalt.into();
        assert_eq!(err.to_string(), "Salt must be 16 bytes");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let err = ApiError::Internal("serde exploded at line 3".into());
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ApiError>();
        assert_send_sync::<RelayError>();
    }
}
