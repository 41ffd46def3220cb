//! Health check DTOs for API responses.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response. Always `{"status":"healthy"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"status": "healthy"}))]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}
