//! Notification DTOs for the send endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{DispatchResult, NotificationRequest};

/// Body of `POST /send-message`. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "fcm_token": "dXNlci1kZXZpY2UtdG9rZW4",
    "title": "Good morning",
    "message": "Have a lovely day",
    "time_window": "morning"
}))]
pub struct SendMessageRequest {
    /// Recipient device token; falls back to the configured default
    #[serde(default)]
    pub fcm_token: Option<String>,
    /// Notification body
    #[serde(default)]
    pub message: Option<String>,
    /// Notification title
    #[serde(default)]
    pub title: Option<String>,
    /// Tag stored with the delivery log entry
    #[serde(default)]
    pub time_window: Option<String>,
}

impl From<SendMessageRequest> for NotificationRequest {
    fn from(request: SendMessageRequest) -> Self {
        NotificationRequest::new(
            request.fcm_token,
            request.title,
            request.message,
            request.time_window,
        )
    }
}

/// Result of a send. Failures carry only `success` and `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "success": true,
    "message": "Message sent successfully",
    "title": "Good morning",
    "body": "Have a lovely day",
    "response": "projects/my-project/messages/0:1700000000000000%abc"
}))]
pub struct SendMessageResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Provider message id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

impl From<DispatchResult> for SendMessageResponse {
    fn from(result: DispatchResult) -> Self {
        Self {
            success: result.success,
            message: result.message,
            title: result.title,
            body: result.body,
            response: result.provider_response_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PushMessage;
    use serde_json::json;

    #[test]
    fn test_request_maps_wire_names() {
        let dto: SendMessageRequest = serde_json::from_value(json!({
            "fcm_token": "abc",
            "message": "body text",
            "title": "",
        }))
        .unwrap();
        let request = NotificationRequest::from(dto);
        assert_eq!(request.recipient_token.as_deref(), Some("abc"));
        assert_eq!(request.body.as_deref(), Some("body text"));
        assert_eq!(request.title, None);
        assert_eq!(request.time_window, None);
    }

    #[test]
    fn test_success_response_shape() {
        let result = DispatchResult::sent(
            PushMessage {
                title: "T".to_string(),
                body: "B".to_string(),
            },
            "projects/p/messages/1".to_string(),
        );
        let value = serde_json::to_value(SendMessageResponse::from(result)).unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "message": "Message sent successfully",
                "title": "T",
                "body": "B",
                "response": "projects/p/messages/1"
            })
        );
    }

    #[test]
    fn test_failure_response_shape() {
        let value = serde_json::to_value(SendMessageResponse::from(DispatchResult::failed(
            "No FCM token provided",
        )))
        .unwrap();
        assert_eq!(value, json!({"success": false, "message": "No FCM token provided"}));
    }
}
