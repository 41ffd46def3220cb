//! Router configuration for the API.

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers::{health::health_routes, notifications::notification_routes};
use crate::api::middleware::{logging_middleware, request_id_middleware};
use crate::config::settings::ServerConfig;
use crate::state::AppState;

/// Creates the application router with all routes and middleware.
///
/// `/send-random` is only routed when the dispatcher runs the basic variant.
/// Middleware is applied in reverse order of declaration, so the request id
/// is assigned before the access log is written.
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(health_routes())
        .merge(notification_routes(state.mode()))
        .split_for_parts();

    let router = if server.enable_docs {
        router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
    } else {
        router
    };

    let router = router
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware));

    let router = if server.cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.with_state(state)
}
