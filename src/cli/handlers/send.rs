//! Send command handler
//!
//! Performs one dispatch with the configured variant and prints the outcome
//! in the same JSON shape the HTTP surface returns.

use crate::api::dto::SendMessageResponse;
use crate::config::Settings;
use crate::error::AppResult;
use crate::models::{DispatchResult, NotificationRequest};
use crate::state::AppState;

pub struct SendCommandHandler {
    state: AppState,
}

impl SendCommandHandler {
    /// Build the dispatcher from configuration.
    ///
    /// # Errors
    /// Fails when the service account credentials are missing or unusable.
    pub fn from_settings(settings: &Settings) -> AppResult<Self> {
        Ok(Self::new(AppState::from_settings(settings)?))
    }

    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Dispatch once and print the result to stdout
    ///
    /// Returns the result so the caller can pick the exit status.
    pub async fn execute(&self, request: NotificationRequest) -> AppResult<DispatchResult> {
        let result = self.state.dispatcher.dispatch(request).await;

        let response = SendMessageResponse::from(result.clone());
        let json = serde_json::to_string_pretty(&response).map_err(anyhow::Error::from)?;
        println!("{}", json);

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::NotificationDispatcher;
    use crate::services::notifications::{ContentSelector, MessagePool, ProviderError, PushProvider};
    use crate::models::PushMessage;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct AcceptingProvider;

    #[async_trait]
    impl PushProvider for AcceptingProvider {
        async fn send(&self, _token: &str, _message: &PushMessage) -> Result<String, ProviderError> {
            Ok("projects/p/messages/1".to_string())
        }

        fn name(&self) -> &'static str {
            "accepting"
        }
    }

    fn handler(default_token: Option<&str>) -> SendCommandHandler {
        let dispatcher = NotificationDispatcher::basic(
            Arc::new(AcceptingProvider),
            ContentSelector::with_seed(MessagePool::builtin(), 7),
        )
        .with_default_token(default_token.map(String::from));
        SendCommandHandler::new(AppState::new(dispatcher))
    }

    #[tokio::test]
    async fn test_send_to_default_recipient() {
        let result = handler(Some("device"))
            .execute(NotificationRequest::default())
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.provider_response_id.as_deref(), Some("projects/p/messages/1"));
    }

    #[tokio::test]
    async fn test_send_without_recipient_reports_failure() {
        let result = handler(None)
            .execute(NotificationRequest::default())
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.message, "No FCM token provided");
    }

    #[test]
    fn test_from_settings_requires_credentials() {
        assert!(SendCommandHandler::from_settings(&Settings::default()).is_err());
    }
}
