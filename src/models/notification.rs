//! Notification models shared by the dispatcher, the delivery log and the
//! HTTP layer.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// Message reported for every successful dispatch
pub const SENT_MESSAGE: &str = "Message sent successfully";

// ============================================================================
// Request
// ============================================================================

/// A request to push one notification.
///
/// Every field is optional. Empty strings are normalized to `None` so
/// callers never need to distinguish "omitted" from "blank".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub recipient_token: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    /// Free-form tag recorded with the delivery log entry
    pub time_window: Option<String>,
}

impl NotificationRequest {
    pub fn new(
        recipient_token: Option<String>,
        title: Option<String>,
        body: Option<String>,
        time_window: Option<String>,
    ) -> Self {
        Self {
            recipient_token: non_empty(recipient_token),
            title: non_empty(title),
            body: non_empty(body),
            time_window: non_empty(time_window),
        }
    }

    /// Re-apply empty-string normalization, for values built by struct literal
    pub fn normalized(self) -> Self {
        Self::new(self.recipient_token, self.title, self.body, self.time_window)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// ============================================================================
// Delivery record
// ============================================================================

/// One entry in the delivery log. The store assigns the timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationRecord {
    pub message: String,
    pub time_window: Option<String>,
    /// Local calendar date of the attempt
    pub date: Date,
}

impl NotificationRecord {
    pub fn new(message: impl Into<String>, time_window: Option<String>) -> Self {
        Self {
            message: message.into(),
            time_window,
            date: jiff::Zoned::now().date(),
        }
    }
}

// ============================================================================
// Provider payload
// ============================================================================

/// Title and body handed to the push provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
}

// ============================================================================
// Result
// ============================================================================

/// Outcome of one dispatch. Failures carry only the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    pub success: bool,
    pub message: String,
    pub title: Option<String>,
    pub body: Option<String>,
    pub provider_response_id: Option<String>,
}

impl DispatchResult {
    pub fn sent(message: PushMessage, provider_response_id: String) -> Self {
        Self {
            success: true,
            message: SENT_MESSAGE.to_string(),
            title: Some(message.title),
            body: Some(message.body),
            provider_response_id: Some(provider_response_id),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            title: None,
            body: None,
            provider_response_id: None,
        }
    }
}
