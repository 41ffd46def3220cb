//! Data Transfer Objects for API requests and responses.

mod health;
mod notification;

pub use health::HealthResponse;
pub use notification::{SendMessageRequest, SendMessageResponse};
