//! Error types for training-alerts-core.

use thiserror::Error;

/// Top-level error type for training-alerts-core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The engine was used before `initialize()` was called.
    #[error("Alert engine not initialized. Call initialize() first.")]
    NotInitialized,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {field} - {message}")]
    ValidationError { field: String, message: String },

    /// A collaborator (session store, percentile source, ...) failed to answer.
    #[error("Source unavailable: {source_name} - {message}")]
    SourceUnavailable {
        source_name: String,
        message: String,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Create a SourceUnavailable error for a named collaborator.
    #[inline]
    pub fn source_unavailable(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create a ValidationError for a field.
    #[inline]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::SerializationError(err.to_string())
    }
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::ConfigError(err.to_string())
    }
}

impl From<toml::de::Error> for CoreError {
    fn from(err: toml::de::Error) -> Self {
        CoreError::ConfigError(format!("Failed to parse config: {}", err))
    }
}

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
