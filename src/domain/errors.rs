//! Domain error types
//!
//! This module defines the error hierarchy for course imports.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main course import error type
///
/// This is the primary error type used throughout the crate.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Errors talking to the Studio import endpoints
    #[error("Studio error: {0}")]
    Studio(#[from] StudioError),

    /// Durable session storage errors
    #[error("Session store error: {0}")]
    SessionStore(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Import output consumed after its owning orchestrator was dropped
    #[error("Import context closed: {0}")]
    ContextClosed(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Studio-specific errors
///
/// Errors that occur when uploading archives or fetching job status.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum StudioError {
    /// Failed to reach the server
    #[error("Failed to connect to Studio: {0}")]
    ConnectionFailed(String),

    /// Request rejected with 403
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Request refused with an explicit server-supplied message
    #[error("Rejected by server ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Invalid response from server
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl StudioError {
    /// Builds the error matching an unsuccessful HTTP status
    ///
    /// `message` is the server-supplied error text, or the raw body when the
    /// server sent none.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            403 => StudioError::AccessDenied(message),
            404 => StudioError::NotFound(message),
            500..=599 => StudioError::ServerError { status, message },
            _ => StudioError::ClientError { status, message },
        }
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            StudioError::AccessDenied(_) => Some(403),
            StudioError::NotFound(_) => Some(404),
            StudioError::ServerError { status, .. }
            | StudioError::ClientError { status, .. }
            | StudioError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ImportError {
    fn from(err: toml::de::Error) -> Self {
        ImportError::Configuration(format!("TOML parse error: {err}"))
    }
}
