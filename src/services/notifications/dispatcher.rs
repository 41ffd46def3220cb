//! Notification dispatch flow.
//!
//! Resolves the recipient and content, writes the delivery log entry in the
//! logged variant, then hands the message to the push provider. Every
//! failure is folded into a `DispatchResult`; nothing propagates further.

use std::sync::Arc;

use thiserror::Error;

use super::content::ContentSelector;
use super::provider::{ProviderError, PushProvider};
use crate::config::DispatchMode;
use crate::models::{DispatchResult, NotificationRecord, NotificationRequest, PushMessage};
use crate::repositories::{DeliveryLogError, DeliveryLogStore};

/// Request-time dispatch failures. Display text is what callers see.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("No FCM token provided")]
    MissingTarget,

    #[error("Both title and message are required")]
    MissingContent,

    #[error("Error logging message: {0}")]
    LogWriteFailed(#[source] DeliveryLogError),

    #[error("Error sending message: {0}")]
    ProviderSendFailed(#[from] ProviderError),
}

impl DispatchError {
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::MissingTarget => "missing_target",
            DispatchError::MissingContent => "missing_content",
            DispatchError::LogWriteFailed(_) => "log_write_failed",
            DispatchError::ProviderSendFailed(e) => e.kind(),
        }
    }
}

enum Variant {
    /// Omitted content is drawn from the pools
    Basic(ContentSelector),
    /// Content is mandatory and every send is logged first
    Logged(Arc<dyn DeliveryLogStore>),
}

/// Dispatches notifications through a `PushProvider`.
///
/// Built once at startup and shared across requests.
pub struct NotificationDispatcher {
    provider: Arc<dyn PushProvider>,
    variant: Variant,
    default_token: Option<String>,
}

impl NotificationDispatcher {
    /// Basic variant: random content when omitted, no delivery log
    pub fn basic(provider: Arc<dyn PushProvider>, content: ContentSelector) -> Self {
        Self {
            provider,
            variant: Variant::Basic(content),
            default_token: None,
        }
    }

    /// Logged variant: explicit content only, log-then-send
    pub fn logged(provider: Arc<dyn PushProvider>, delivery_log: Arc<dyn DeliveryLogStore>) -> Self {
        Self {
            provider,
            variant: Variant::Logged(delivery_log),
            default_token: None,
        }
    }

    /// Recipient used when a request names none. Empty means unset.
    pub fn with_default_token(mut self, token: Option<String>) -> Self {
        self.default_token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn mode(&self) -> DispatchMode {
        match self.variant {
            Variant::Basic(_) => DispatchMode::Basic,
            Variant::Logged(_) => DispatchMode::Logged,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Run one dispatch. Never fails; the outcome is in the result.
    pub async fn dispatch(&self, request: NotificationRequest) -> DispatchResult {
        let request = request.normalized();

        match self.try_dispatch(&request).await {
            Ok((token, message, response_id)) => {
                tracing::info!(
                    mode = %self.mode(),
                    provider = self.provider.name(),
                    recipient = %redact(&token),
                    response_id = %response_id,
                    "Notification sent"
                );
                DispatchResult::sent(message, response_id)
            }
            Err(e) => {
                tracing::warn!(
                    mode = %self.mode(),
                    provider = self.provider.name(),
                    kind = e.kind(),
                    error = %e,
                    "Notification not sent"
                );
                DispatchResult::failed(e.to_string())
            }
        }
    }

    async fn try_dispatch(
        &self,
        request: &NotificationRequest,
    ) -> Result<(String, PushMessage, String), DispatchError> {
        let token = self.resolve_target(request)?;
        let message = self.resolve_content(request)?;

        if let Variant::Logged(delivery_log) = &self.variant {
            let record = NotificationRecord::new(message.body.clone(), request.time_window.clone());
            delivery_log
                .append(&record)
                .await
                .map_err(DispatchError::LogWriteFailed)?;
        }

        let response_id = self.provider.send(&token, &message).await?;
        Ok((token, message, response_id))
    }

    fn resolve_target(&self, request: &NotificationRequest) -> Result<String, DispatchError> {
        request
            .recipient_token
            .as_ref()
            .or(self.default_token.as_ref())
            .cloned()
            .ok_or(DispatchError::MissingTarget)
    }

    fn resolve_content(&self, request: &NotificationRequest) -> Result<PushMessage, DispatchError> {
        match &self.variant {
            Variant::Basic(content) => Ok(PushMessage {
                title: content.title(request.title.as_deref()),
                body: content.body(request.body.as_deref()),
            }),
            Variant::Logged(_) => match (&request.title, &request.body) {
                (Some(title), Some(body)) => Ok(PushMessage {
                    title: title.clone(),
                    body: body.clone(),
                }),
                _ => Err(DispatchError::MissingContent),
            },
        }
    }
}

/// First few characters of a device token, for logs
fn redact(token: &str) -> String {
    let prefix: String = token.chars().take(8).collect();
    format!("{}…", prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notifications::content::{BUILTIN_BODIES, BUILTIN_TITLES, MessagePool};
    use crate::models::SENT_MESSAGE;
    use async_trait::async_trait;
    use proptest::prelude::*;
    use std::sync::Mutex;

    /// Records every send and replies with a fixed outcome
    #[derive(Default)]
    struct SpyProvider {
        sent: Mutex<Vec<(String, PushMessage)>>,
        fail: bool,
    }

    impl SpyProvider {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl PushProvider for SpyProvider {
        async fn send(&self, token: &str, message: &PushMessage) -> Result<String, ProviderError> {
            self.sent
                .lock()
                .unwrap()
                .push((token.to_string(), message.clone()));
            if self.fail {
                Err(ProviderError::Unregistered("Requested entity was not found.".to_string()))
            } else {
                Ok(format!("projects/p/messages/{}", self.calls()))
            }
        }

        fn name(&self) -> &'static str {
            "spy"
        }
    }

    #[derive(Default)]
    struct SpyLog {
        records: Mutex<Vec<NotificationRecord>>,
        fail: bool,
    }

    #[async_trait]
    impl DeliveryLogStore for SpyLog {
        async fn append(&self, record: &NotificationRecord) -> Result<(), DeliveryLogError> {
            if self.fail {
                return Err(DeliveryLogError::Rejected {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    fn basic(provider: Arc<SpyProvider>) -> NotificationDispatcher {
        NotificationDispatcher::basic(provider, ContentSelector::with_seed(MessagePool::builtin(), 3))
    }

    fn request(token: Option<&str>, title: Option<&str>, body: Option<&str>) -> NotificationRequest {
        NotificationRequest::new(
            token.map(str::to_string),
            title.map(str::to_string),
            body.map(str::to_string),
            None,
        )
    }

    #[tokio::test]
    async fn test_explicit_content_is_sent_verbatim() {
        let provider = Arc::new(SpyProvider::default());
        let dispatcher = basic(provider.clone());

        let result = dispatcher
            .dispatch(request(Some("device-1"), Some("Hi"), Some("There")))
            .await;

        assert!(result.success);
        assert_eq!(result.message, SENT_MESSAGE);
        assert_eq!(result.title.as_deref(), Some("Hi"));
        assert_eq!(result.body.as_deref(), Some("There"));
        assert_eq!(result.provider_response_id.as_deref(), Some("projects/p/messages/1"));

        let sent = provider.sent.lock().unwrap();
        assert_eq!(sent[0].0, "device-1");
    }

    #[tokio::test]
    async fn test_omitted_content_comes_from_pools() {
        let provider = Arc::new(SpyProvider::default());
        let result = basic(provider)
            .with_default_token(Some("fallback".to_string()))
            .dispatch(NotificationRequest::default())
            .await;

        assert!(result.success);
        assert!(BUILTIN_TITLES.contains(&result.title.unwrap().as_str()));
        assert!(BUILTIN_BODIES.contains(&result.body.unwrap().as_str()));
    }

    #[tokio::test]
    async fn test_default_token_used_when_request_has_none() {
        let provider = Arc::new(SpyProvider::default());
        basic(provider.clone())
            .with_default_token(Some("fallback".to_string()))
            .dispatch(request(Some(""), None, None))
            .await;

        assert_eq!(provider.sent.lock().unwrap()[0].0, "fallback");
    }

    #[tokio::test]
    async fn test_missing_target_makes_no_calls() {
        let provider = Arc::new(SpyProvider::default());
        let log = Arc::new(SpyLog::default());

        let basic_result = basic(provider.clone())
            .with_default_token(Some(String::new()))
            .dispatch(NotificationRequest::default())
            .await;
        let logged_result = NotificationDispatcher::logged(provider.clone(), log.clone())
            .dispatch(request(None, Some("t"), Some("b")))
            .await;

        for result in [basic_result, logged_result] {
            assert!(!result.success);
            assert_eq!(result.message, "No FCM token provided");
            assert!(result.title.is_none());
        }
        assert_eq!(provider.calls(), 0);
        assert!(log.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_is_reported() {
        let provider = Arc::new(SpyProvider::failing());
        let result = basic(provider)
            .dispatch(request(Some("device-1"), None, None))
            .await;

        assert!(!result.success);
        assert!(result.message.starts_with("Error sending message: "));
        assert!(result.message.contains("Requested entity was not found."));
        assert!(result.provider_response_id.is_none());
    }

    #[tokio::test]
    async fn test_logged_variant_requires_content() {
        let provider = Arc::new(SpyProvider::default());
        let log = Arc::new(SpyLog::default());
        let dispatcher = NotificationDispatcher::logged(provider.clone(), log.clone());

        let result = dispatcher
            .dispatch(request(Some("device-1"), Some("Title"), Some("")))
            .await;

        assert!(!result.success);
        assert_eq!(result.message, "Both title and message are required");
        assert_eq!(provider.calls(), 0);
        assert!(log.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_logged_variant_logs_before_sending() {
        let provider = Arc::new(SpyProvider::default());
        let log = Arc::new(SpyLog::default());
        let dispatcher = NotificationDispatcher::logged(provider.clone(), log.clone());

        let mut req = request(Some("device-1"), Some("Title"), Some("Body"));
        req.time_window = Some("evening".to_string());
        let result = dispatcher.dispatch(req).await;

        assert!(result.success);
        let records = log.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "Body");
        assert_eq!(records[0].time_window.as_deref(), Some("evening"));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_log_failure_prevents_delivery() {
        let provider = Arc::new(SpyProvider::default());
        let log = Arc::new(SpyLog {
            fail: true,
            ..Default::default()
        });
        let result = NotificationDispatcher::logged(provider.clone(), log)
            .dispatch(request(Some("device-1"), Some("Title"), Some("Body")))
            .await;

        assert!(!result.success);
        assert!(result.message.starts_with("Error logging message: "));
        assert_eq!(provider.calls(), 0);
    }

    #[test]
    fn test_mode_follows_variant() {
        let provider = Arc::new(SpyProvider::default());
        assert_eq!(basic(provider.clone()).mode(), DispatchMode::Basic);
        assert_eq!(
            NotificationDispatcher::logged(provider, Arc::new(SpyLog::default())).mode(),
            DispatchMode::Logged
        );
    }

    #[test]
    fn test_redact_keeps_short_prefix() {
        assert_eq!(redact("abcdefghijklmnop"), "abcdefgh…");
        assert_eq!(redact("abc"), "abc…");
    }

    proptest! {
        #[test]
        fn property_explicit_values_survive_dispatch(
            title in "[a-zA-Z0-9 ]{1,20}",
            body in "[a-zA-Z0-9 ]{1,40}",
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
            let result = runtime.block_on(
                basic(Arc::new(SpyProvider::default()))
                    .dispatch(request(Some("device"), Some(&title), Some(&body))),
            );
            prop_assert_eq!(result.title, Some(title));
            prop_assert_eq!(result.body, Some(body));
        }
    }
}
