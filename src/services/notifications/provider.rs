//! Push provider abstraction.
//!
//! The dispatcher only sees this trait, so tests substitute in-memory fakes
//! for the real FCM client.

use async_trait::async_trait;
use thiserror::Error;

use crate::external::google::AuthError;
use crate::models::PushMessage;

/// Why a provider refused or failed to deliver.
///
/// The variants are told apart in logs; callers treat them as one class.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("invalid registration token: {0}")]
    InvalidToken(String),

    #[error("registration token is not registered: {0}")]
    Unregistered(String),

    #[error("provider authentication failed: {0}")]
    Auth(String),

    #[error("provider request failed: {0}")]
    Transport(String),

    #[error("provider rejected the message: {0}")]
    Rejected(String),
}

impl ProviderError {
    /// Short label for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::InvalidToken(_) => "invalid_token",
            ProviderError::Unregistered(_) => "unregistered",
            ProviderError::Auth(_) => "auth",
            ProviderError::Transport(_) => "transport",
            ProviderError::Rejected(_) => "rejected",
        }
    }
}

impl From<AuthError> for ProviderError {
    fn from(error: AuthError) -> Self {
        ProviderError::Auth(format!("{:#}", anyhow::Error::from(error)))
    }
}

/// Sends one notification to one device token
///
/// # Example Implementation
/// ```ignore
/// struct Recorder;
///
/// #[async_trait]
/// impl PushProvider for Recorder {
///     async fn send(&self, token: &str, message: &PushMessage) -> Result<String, ProviderError> {
///         Ok(format!("sent/{}", token))
///     }
///
///     fn name(&self) -> &'static str {
///         "recorder"
///     }
/// }
/// ```
#[async_trait]
pub trait PushProvider: Send + Sync {
    /// Deliver `message` to `token`, returning the provider's message id
    async fn send(&self, token: &str, message: &PushMessage) -> Result<String, ProviderError>;

    fn name(&self) -> &'static str;
}
