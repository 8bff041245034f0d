//! Error type definitions for the emoji kitchen proxy

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Key-value store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Dataset fetch errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Key-value store specific errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem failures in a file-backed store
    #[error("I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Keys that cannot be mapped onto the backing storage
    #[error("Invalid key: '{key}'")]
    InvalidKey { key: String },

    /// Stored value could not be decoded as the requested type
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Dataset fetch errors
///
/// Cloneable so one in-flight fetch can hand the same result to every waiter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, timeout)
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// Upstream answered with a non-success status
    #[error("Upstream {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// Body was not a valid combination dataset
    #[error("Failed to parse dataset: {message}")]
    Parse { message: String },
}

impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status this error surfaces as
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Fetch(_) | AppError::Http(_) => StatusCode::BAD_GATEWAY,
            AppError::Store(_) | AppError::Configuration { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl StoreError {
    pub fn io<S: Into<String>>(key: S, source: std::io::Error) -> Self {
        Self::Io {
            key: key.into(),
            source,
        }
    }

    pub fn invalid_key<S: Into<String>>(key: S) -> Self {
        Self::InvalidKey { key: key.into() }
    }
}

/// Failures carry no diagnostic body, only the status reason
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::error!(error = %self, status = status.as_u16(), "Request failed");

        let reason = status.canonical_reason().unwrap_or("Error");
        (status, format!("{} {}", status.as_u16(), reason)).into_response()
    }
}
