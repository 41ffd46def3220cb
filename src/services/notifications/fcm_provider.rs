//! Firebase Cloud Messaging (HTTP v1) provider.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::provider::{ProviderError, PushProvider};
use crate::external::client::HTTP_CLIENT;
use crate::external::google::TokenSource;
use crate::models::PushMessage;

/// FCM provider using the shared `HTTP_CLIENT`.
///
/// Every message carries fixed platform hints for high-priority, immediate
/// delivery that also wakes the app on iOS.
pub struct FcmProvider {
    token_source: Arc<dyn TokenSource>,
    endpoint: String,
    project_id: String,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: ErrorBody,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "errorCode", default)]
    error_code: Option<String>,
}

impl FcmProvider {
    pub fn new(
        token_source: Arc<dyn TokenSource>,
        endpoint: impl Into<String>,
        project_id: impl Into<String>,
    ) -> Self {
        Self {
            token_source,
            endpoint: endpoint.into(),
            project_id: project_id.into(),
        }
    }

    fn send_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/messages:send",
            self.endpoint.trim_end_matches('/'),
            self.project_id
        )
    }

    /// The `messages:send` request body
    pub(crate) fn request_body(token: &str, message: &PushMessage) -> Value {
        json!({
            "message": {
                "token": token,
                "notification": {
                    "title": message.title,
                    "body": message.body,
                },
                "android": {
                    "priority": "HIGH",
                    "ttl": "0s",
                },
                "apns": {
                    "headers": {
                        "apns-priority": "10",
                        "apns-push-type": "alert",
                    },
                    "payload": {
                        "aps": {
                            "content-available": 1,
                        },
                    },
                },
            }
        })
    }

    /// Map an FCM error response onto `ProviderError`
    pub(crate) fn classify(status: u16, body: &str) -> ProviderError {
        let envelope: ErrorEnvelope = serde_json::from_str(body).unwrap_or_default();
        let error = envelope.error;
        let message = if error.message.is_empty() {
            format!("HTTP {}", status)
        } else {
            error.message
        };
        let code = error
            .details
            .iter()
            .find_map(|d| d.error_code.as_deref())
            .unwrap_or(error.status.as_str());

        match (status, code) {
            (_, "UNREGISTERED") | (404, _) => ProviderError::Unregistered(message),
            (_, "THIRD_PARTY_AUTH_ERROR" | "SENDER_ID_MISMATCH" | "UNAUTHENTICATED" | "PERMISSION_DENIED")
            | (401 | 403, _) => ProviderError::Auth(message),
            (_, "INVALID_ARGUMENT") => ProviderError::InvalidToken(message),
            _ => ProviderError::Rejected(message),
        }
    }
}

#[async_trait]
impl PushProvider for FcmProvider {
    async fn send(&self, token: &str, message: &PushMessage) -> Result<String, ProviderError> {
        let access_token = self.token_source.access_token().await?;

        let response = HTTP_CLIENT
            .post(self.send_url())
            .bearer_auth(access_token)
            .json(&Self::request_body(token, message))
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify(status.as_u16(), &body));
        }

        let sent: SendResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Ok(sent.name)
    }

    fn name(&self) -> &'static str {
        "fcm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::google::AuthError;
    use axum::{
        Json, Router,
        extract::{Path, State},
        http::{HeaderMap, StatusCode},
        routing::post,
    };
    use std::sync::Mutex;

    struct StaticToken;

    #[async_trait]
    impl TokenSource for StaticToken {
        async fn access_token(&self) -> Result<String, AuthError> {
            Ok("test-access-token".to_string())
        }
    }

    struct FailingToken;

    #[async_trait]
    impl TokenSource for FailingToken {
        async fn access_token(&self) -> Result<String, AuthError> {
            Err(AuthError::Rejected {
                status: 400,
                body: "invalid_grant".to_string(),
            })
        }
    }

    #[derive(Clone, Default)]
    struct Captured {
        requests: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
    }

    async fn spawn_fcm(status: StatusCode, reply: Value) -> (String, Captured) {
        let captured = Captured::default();
        let state = (captured.clone(), status, reply);
        let app = Router::new()
            .route(
                "/v1/projects/{project}/{action}",
                post(
                    |State((captured, status, reply)): State<(Captured, StatusCode, Value)>,
                     Path((project, _action)): Path<(String, String)>,
                     headers: HeaderMap,
                     Json(body): Json<Value>| async move {
                        let auth = headers
                            .get("authorization")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        captured.requests.lock().unwrap().push((project, auth, body));
                        (status, Json(reply))
                    },
                ),
            )
            .with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), captured)
    }

    fn message() -> PushMessage {
        PushMessage {
            title: "Hello".to_string(),
            body: "World".to_string(),
        }
    }

    #[test]
    fn test_request_body_shape() {
        let body = FcmProvider::request_body("device-1", &message());
        let expected = json!({
            "message": {
                "token": "device-1",
                "notification": {"title": "Hello", "body": "World"},
                "android": {"priority": "HIGH", "ttl": "0s"},
                "apns": {
                    "headers": {"apns-priority": "10", "apns-push-type": "alert"},
                    "payload": {"aps": {"content-available": 1}}
                }
            }
        });
        assert_eq!(body, expected);
    }

    #[test]
    fn test_classify_errors() {
        let unregistered = r#"{"error":{"code":404,"status":"NOT_FOUND","message":"Requested entity was not found.","details":[{"@type":"type.googleapis.com/google.firebase.fcm.v1.FcmError","errorCode":"UNREGISTERED"}]}}"#;
        assert!(matches!(
            FcmProvider::classify(404, unregistered),
            ProviderError::Unregistered(m) if m == "Requested entity was not found."
        ));

        let invalid = r#"{"error":{"code":400,"status":"INVALID_ARGUMENT","message":"The registration token is not a valid FCM registration token"}}"#;
        assert!(matches!(
            FcmProvider::classify(400, invalid),
            ProviderError::InvalidToken(_)
        ));

        assert!(matches!(
            FcmProvider::classify(401, "{}"),
            ProviderError::Auth(m) if m == "HTTP 401"
        ));

        assert!(matches!(
            FcmProvider::classify(503, "upstream unavailable"),
            ProviderError::Rejected(_)
        ));
    }

    #[tokio::test]
    async fn test_send_returns_message_name() {
        let (endpoint, captured) = spawn_fcm(
            StatusCode::OK,
            json!({"name": "projects/pushnote-test/messages/0:1234"}),
        )
        .await;
        let provider = FcmProvider::new(Arc::new(StaticToken), endpoint, "pushnote-test");

        let id = provider.send("device-1", &message()).await.unwrap();
        assert_eq!(id, "projects/pushnote-test/messages/0:1234");

        let requests = captured.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let (project, auth, body) = &requests[0];
        assert_eq!(project, "pushnote-test");
        assert_eq!(auth.as_deref(), Some("Bearer test-access-token"));
        assert_eq!(body["message"]["token"], "device-1");
    }

    #[tokio::test]
    async fn test_send_surfaces_classified_error() {
        let (endpoint, _) = spawn_fcm(
            StatusCode::BAD_REQUEST,
            json!({"error": {"status": "INVALID_ARGUMENT", "message": "bad token"}}),
        )
        .await;
        let provider = FcmProvider::new(Arc::new(StaticToken), endpoint, "pushnote-test");

        let err = provider.send("nope", &message()).await.unwrap_err();
        assert_eq!(err.kind(), "invalid_token");
    }

    #[tokio::test]
    async fn test_token_failure_is_auth_error() {
        let provider = FcmProvider::new(
            Arc::new(FailingToken),
            "http://127.0.0.1:1",
            "pushnote-test",
        );
        let err = provider.send("device-1", &message()).await.unwrap_err();
        assert_eq!(err.kind(), "auth");
        assert!(err.to_string().contains("invalid_grant"));
    }
}
