use thiserror::Error;

use crate::config::error::ConfigError;
use crate::external::google::CredentialError;

/// Application-wide error type for everything outside the dispatch path.
///
/// Request-time dispatch failures never become an `AppError`; they are
/// folded into a `DispatchResult` by the dispatcher. This type covers
/// startup and configuration problems.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Provider credentials could not be turned into a working client.
    /// Fatal at startup.
    #[error("Provider credential bootstrap failed")]
    Credential {
        #[source]
        source: CredentialError,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<CredentialError> for AppError {
    fn from(error: CredentialError) -> Self {
        AppError::Credential { source: error }
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
            source: anyhow::Error::from(error),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation_error_keeps_field() {
        let error: AppError = ConfigError::validation("server.port", "Port must be positive").into();
        match error {
            AppError::Configuration { key, .. } => assert_eq!(key, "server.port"),
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_credential_error_is_wrapped() {
        let error: AppError = CredentialError::Missing.into();
        assert!(matches!(error, AppError::Credential { .. }));
        assert_eq!(error.to_string(), "Provider credential bootstrap failed");
    }
}
