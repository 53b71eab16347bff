//! Error types for the cache service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == API Error Enum ==
/// Errors surfaced by the HTTP layer.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Key not found in any tier
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Storage Error Enum ==
/// Failures of a durable key-value store.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Write would exceed the store's capacity
    #[error("Storage quota exceeded: {needed} bytes needed, {available} available")]
    QuotaExceeded { needed: usize, available: usize },

    /// Underlying file I/O failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backing file could not be encoded or decoded
    #[error("Storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

// == Image Error Enum ==
/// Failures while loading an image into memory.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// Source string is empty or malformed
    #[error("Invalid image source: {0}")]
    InvalidSource(String),

    /// Loader could not fetch the image
    #[error("Failed to load image {src}: {reason}")]
    LoadFailed { src: String, reason: String },
}

// == Result Type Alias ==
/// Convenience Result type for HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
