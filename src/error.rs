//! Error types for the record service
//!
//! Provides unified error handling using thiserror.

use axum::http::StatusCode;
use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised by the cache engine.
///
/// A missing key is not an error; lookups return `Option` and deletes `bool`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Invalid construction parameters
    #[error("Invalid cache configuration: {0}")]
    Config(String),

    /// A single entry exceeds the allowed size
    #[error("Entry of {size} bytes exceeds the limit of {max} bytes")]
    Oversize { size: usize, max: usize },
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;

// == API Error Enum ==
/// Failures surfaced by the HTTP handlers.
///
/// Each one becomes a response envelope carrying its status and message.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No record under the requested key
    #[error("{0}")]
    NotFound(String),

    /// Cached bytes could not be decoded into a record
    #[error("{0}")]
    Decode(String),

    /// Request body is not valid JSON for a record
    #[error("{0}")]
    InvalidRequest(String),

    /// Request is well-formed but missing required values
    #[error("{0}")]
    Unprocessable(String),

    /// Request did not finish within the configured deadline
    #[error("{0}")]
    Timeout(String),

    /// Cache rejected the operation
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl ApiError {
    /// HTTP status reported for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Decode(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            ApiError::Cache(CacheError::Oversize { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Cache(CacheError::Config(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
