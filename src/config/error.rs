//! Configuration error types

use thiserror::Error;

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file named explicitly (`--config`, `PUSHNOTE_CONFIG_FILE`) is missing
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// The merged sources could not be deserialized into `Settings`
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// A value is out of range or malformed
    #[error("Validation error: {field} - {message}")]
    ValidationError { field: String, message: String },

    /// An environment variable holds an unusable value
    #[error("Environment variable error: {0}")]
    EnvVarError(String),

    /// Two settings that cannot be combined were both given
    #[error("Mutual exclusivity error: {0}")]
    MutualExclusivityError(String),

    /// Error surfaced by the `config` crate while merging sources
    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found<S: Into<String>>(path: S) -> Self {
        ConfigError::FileNotFound(path.into())
    }

    pub fn mutual_exclusivity<S: Into<String>>(message: S) -> Self {
        ConfigError::MutualExclusivityError(message.into())
    }
}
