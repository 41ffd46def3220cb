//! Health check endpoint.
//!
//! Answers as long as the process serves requests. No dependency checks.

use axum::response::Json;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::HealthResponse;
use crate::state::AppState;

pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(health_check))
}

/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = HEALTH_TAG
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
