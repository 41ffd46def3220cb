//! Delivery log store backed by Cloud Firestore.
//!
//! Write-only and append-only: one document per send attempt, created
//! through the REST `documents:commit` call.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use thiserror::Error;

use crate::config::DeliveryLogConfig;
use crate::external::client::HTTP_CLIENT;
use crate::external::google::{AuthError, TokenSource};
use crate::models::NotificationRecord;

#[derive(Debug, Error)]
pub enum DeliveryLogError {
    #[error("delivery log authentication failed")]
    Auth(#[from] AuthError),

    #[error("delivery log request failed: {0}")]
    Transport(String),

    #[error("delivery log write rejected with {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Append-only record of attempted sends
#[async_trait]
pub trait DeliveryLogStore: Send + Sync {
    /// Persist `record`. Returns once the store has acknowledged the write.
    async fn append(&self, record: &NotificationRecord) -> Result<(), DeliveryLogError>;
}

/// Firestore delivery log repository
pub struct FirestoreDeliveryLog {
    token_source: Arc<dyn TokenSource>,
    endpoint: String,
    project_id: String,
    database: String,
    collection: String,
}

impl FirestoreDeliveryLog {
    pub fn new(
        token_source: Arc<dyn TokenSource>,
        project_id: impl Into<String>,
        config: &DeliveryLogConfig,
    ) -> Self {
        Self {
            token_source,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            database: config.database.clone(),
            collection: config.collection.clone(),
        }
    }

    fn database_path(&self) -> String {
        format!("projects/{}/databases/{}", self.project_id, self.database)
    }

    fn commit_url(&self) -> String {
        format!("{}/v1/{}/documents:commit", self.endpoint, self.database_path())
    }

    /// Commit body creating `<collection>/<document_id>`. The `timestamp`
    /// field is filled in by the server at commit time.
    pub(crate) fn commit_body(&self, document_id: &str, record: &NotificationRecord) -> Value {
        let time_window = match &record.time_window {
            Some(tag) => json!({ "stringValue": tag }),
            None => json!({ "nullValue": null }),
        };

        json!({
            "writes": [{
                "update": {
                    "name": format!(
                        "{}/documents/{}/{}",
                        self.database_path(),
                        self.collection,
                        document_id
                    ),
                    "fields": {
                        "message": { "stringValue": record.message },
                        "time_window": time_window,
                        "date": { "stringValue": record.date.to_string() },
                    },
                },
                "currentDocument": { "exists": false },
                "updateTransforms": [{
                    "fieldPath": "timestamp",
                    "setToServerValue": "REQUEST_TIME",
                }],
            }]
        })
    }
}

#[async_trait]
impl DeliveryLogStore for FirestoreDeliveryLog {
    async fn append(&self, record: &NotificationRecord) -> Result<(), DeliveryLogError> {
        let access_token = self.token_source.access_token().await?;
        let document_id = uuid::Uuid::new_v4().to_string();

        let response = HTTP_CLIENT
            .post(self.commit_url())
            .bearer_auth(access_token)
            .json(&self.commit_body(&document_id, record))
            .send()
            .await
            .map_err(|e| DeliveryLogError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryLogError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(document_id = %document_id, collection = %self.collection, "Delivery recorded");
        Ok(())
    }
}
