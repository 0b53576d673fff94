//! Error types for the Varta client.

use thiserror::Error;

/// Message shown when the backend gives no usable explanation.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Errors that can occur while talking to the CRM backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or HTTP transport error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend rejected the session (401 or 403).
    ///
    /// The persisted session has already been cleared when this is returned.
    #[error("session rejected by backend ({status})")]
    Unauthorized {
        /// HTTP status code, 401 or 403.
        status: u16,
    },

    /// The backend returned an error response.
    #[error("backend error: {status} - {message}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Message drawn from the response body, or the generic fallback.
        message: String,
    },

    /// Failed to deserialize a response.
    #[error("invalid response format: {0}")]
    InvalidResponse(String),

    /// Input rejected before any request was made.
    #[error("invalid input: {field} - {message}")]
    InvalidInput {
        /// The offending field.
        field: &'static str,
        /// Human-readable explanation.
        message: String,
    },

    /// Local file access failed (CSV upload, export download).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The session could not be persisted.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    /// Creates a new invalid input error.
    #[must_use]
    pub fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }

    /// Returns true if the backend rejected the session.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// The single human-readable message to show the operator.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Backend { message, .. } => message.clone(),
            Self::InvalidInput { message, .. } => message.clone(),
            Self::Unauthorized { .. } => "Your session has expired. Please log in again.".into(),
            Self::Io(e) => e.to_string(),
            Self::Network(_) | Self::InvalidResponse(_) | Self::Session(_) => {
                GENERIC_ERROR_MESSAGE.to_string()
            }
        }
    }
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors from reading or writing the persisted session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the session file failed.
    #[error("session file error: {0}")]
    Io(#[from] std::io::Error),

    /// The session file could not be encoded or decoded.
    #[error("session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from saving the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No platform configuration directory is available.
    #[error("could not determine config directory")]
    NoConfigDir,

    /// Writing the configuration failed.
    #[error("failed to write config: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding the configuration failed.
    #[error("failed to serialize config: {0}")]
    Serialization(#[from] serde_json::Error),
}
