//! Unified error type for the directory client and its transport.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for directory operations.
///
/// Every variant except `Configuration` originates in the transport layer.
/// The directory client itself never builds or rewrites one of these; it
/// hands back whatever the transport produced.
#[derive(Error, Debug)]
pub enum DirectoryError {
    // ============ Remote Errors ============
    /// The remote resource does not exist (HTTP 404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The remote service rejected the payload (HTTP 400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflicting remote state, e.g. a duplicate user name (HTTP 409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or invalid credentials (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Credentials lack the required permission (HTTP 403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Remote throttling (HTTP 429)
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Any other non-success status
    #[error("Remote error {status}: {message}")]
    Remote { status: u16, message: String },

    // ============ Transport Errors ============
    /// Network or connection failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request or response body could not be (de)serialized
    #[error("Decode error: {0}")]
    Decode(String),

    /// The request deadline elapsed
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// The request was cancelled through its context
    #[error("Request cancelled")]
    Cancelled,

    // ============ Local Errors ============
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DirectoryError {
    /// Returns the HTTP status code associated with this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::RateLimited(_) => 429,
            Self::Remote { status, .. } => *status,
            Self::Transport(_) => 502,
            Self::Timeout(_) => 504,
            Self::Cancelled => 499,
            Self::Decode(_) | Self::Configuration(_) | Self::Internal(_) | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::RateLimited(_) => "RATE_LIMIT_EXCEEDED",
            Self::Remote { .. } => "REMOTE_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Cancelled => "CANCELLED",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found<T: Into<String>>(message: T) -> Self {
        Self::NotFound(message.into())
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if repeating the same request could succeed.
    ///
    /// Informational only: nothing in this workspace retries.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout(_) | Self::RateLimited(_) => true,
            Self::Remote { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for DirectoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error report, printed by the CLI on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Associated HTTP status
    pub status: u16,
}

impl ErrorResponse {
    /// Creates a new error report from a `DirectoryError`.
    #[must_use]
    pub fn from_error(error: &DirectoryError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            status: error.status_code(),
        }
    }
}

impl From<&DirectoryError> for ErrorResponse {
    fn from(error: &DirectoryError) -> Self {
        Self::from_error(error)
    }
}
