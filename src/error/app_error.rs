use thiserror::Error;

use crate::config::error::ConfigError;

/// Application-wide error type.
///
/// Network, status and schema failures are transient from the caller's point
/// of view: a domain fetch recovers from them with any cached entry and only
/// surfaces them when nothing is cached.
#[derive(Error, Debug)]
pub enum AppError {
    /// Connection or transport failure while talking to the API
    #[error("Request to {url} failed")]
    Network {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    /// The request did not complete within the allowed time
    #[error("Request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    /// The request was cancelled by the caller
    #[error("Request to {url} was cancelled")]
    Cancelled { url: String },

    /// The API answered with a non-success status
    #[error("Request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// The response body is not a usable feature collection
    #[error("Invalid GeoJSON payload: {reason}")]
    SchemaValidation { reason: String },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Whether a cached entry may stand in for this failure.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AppError::Network { .. }
                | AppError::Timeout { .. }
                | AppError::Cancelled { .. }
                | AppError::HttpStatus { .. }
                | AppError::SchemaValidation { .. }
        )
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let key = match &error {
            ConfigError::ValidationError { field, .. } => field.clone(),
            _ => "settings".to_string(),
        };
        AppError::Configuration {
            key,
            source: error.into(),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
