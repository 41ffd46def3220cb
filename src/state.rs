//! Application state for the Axum router.

use std::sync::Arc;

use crate::config::{DispatchMode, Settings};
use crate::error::AppResult;
use crate::external::google::{ServiceAccountKey, ServiceAccountTokenSource, TokenSource};
use crate::repositories::FirestoreDeliveryLog;
use crate::services::NotificationDispatcher;
use crate::services::notifications::{ContentSelector, FcmProvider, MessagePool};

/// Shared state handed to every handler. Cloning only bumps a refcount.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<NotificationDispatcher>,
}

impl AppState {
    pub fn new(dispatcher: NotificationDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Builds the provider client and dispatcher from configuration.
    ///
    /// Fails when the service account credentials are missing or unusable,
    /// which is fatal at startup.
    pub fn from_settings(settings: &Settings) -> AppResult<Self> {
        let key = ServiceAccountKey::from_config(&settings.firebase)?;
        let project_id = key.project_id.clone();
        let token_source: Arc<dyn TokenSource> = Arc::new(ServiceAccountTokenSource::new(key)?);

        let provider = Arc::new(FcmProvider::new(
            token_source.clone(),
            settings.firebase.fcm_endpoint.clone(),
            project_id.clone(),
        ));

        let dispatcher = match settings.dispatch.mode {
            DispatchMode::Basic => NotificationDispatcher::basic(
                provider,
                ContentSelector::new(MessagePool::from_config(&settings.content)),
            ),
            DispatchMode::Logged => NotificationDispatcher::logged(
                provider,
                Arc::new(FirestoreDeliveryLog::new(
                    token_source,
                    project_id.clone(),
                    &settings.delivery_log,
                )),
            ),
        }
        .with_default_token(settings.dispatch.default_token.clone());

        tracing::info!(
            project_id = %project_id,
            mode = %settings.dispatch.mode.as_str(),
            default_token_configured = settings.dispatch.default_token.as_deref().is_some_and(|t| !t.is_empty()),
            "Dispatcher initialized"
        );

        Ok(Self::new(dispatcher))
    }

    pub fn mode(&self) -> DispatchMode {
        self.dispatcher.mode()
    }
}
