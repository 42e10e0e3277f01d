//! Error types for the store and its HTTP surface
//!
//! Provides unified error handling using thiserror.

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Store Error Enum ==
/// Error type for the store core.
///
/// Absence of a key or version is never an error; those are plain `None`
/// or default results.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Rejected configuration (e.g. zero cache capacity)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Snapshot file could not be read or written
    #[error("Snapshot I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot contents could not be encoded or decoded
    #[error("Snapshot format error: {0}")]
    Format(#[from] serde_json::Error),

    /// A background snapshot write failed
    #[error("Snapshot write failed: {0}")]
    Snapshot(String),

    /// The background snapshot writer is no longer running
    #[error("Snapshot writer stopped")]
    WriterStopped,

    /// A persistent store was opened outside a Tokio runtime
    #[error("Persistent store requires a Tokio runtime: {0}")]
    NoRuntime(String),
}

impl StoreError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the store.
pub type Result<T> = std::result::Result<T, StoreError>;

// == API Error Enum ==
/// Error type returned by HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Key or version not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidConfig(msg) => ApiError::InvalidRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

/// Result type for HTTP handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mentions_path() {
        let err = StoreError::io(
            "/tmp/snap.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/snap.json"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_store_error_maps_to_api_error() {
        let api: ApiError = StoreError::InvalidConfig("zero".to_string()).into();
        assert!(matches!(api, ApiError::InvalidRequest(_)));

        let api: ApiError = StoreError::WriterStopped.into();
        assert!(matches!(api, ApiError::Internal(_)));
    }

    #[test]
    fn test_error_status_codes() {
        let test_cases = vec![
            (ApiError::NotFound("key".to_string()), StatusCode::NOT_FOUND),
            (ApiError::InvalidRequest("bad".to_string()), StatusCode::BAD_REQUEST),
            (ApiError::Internal("error".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected_status) in test_cases {
            assert_eq!(error.into_response().status(), expected_status);
        }
    }
}
