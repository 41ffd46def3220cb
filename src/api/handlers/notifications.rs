//! Notification dispatch handlers.

use axum::{Json, extract::State, http::StatusCode};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::NOTIFICATION_TAG;
use crate::api::dto::{SendMessageRequest, SendMessageResponse};
use crate::api::extract::OptionalJson;
use crate::config::DispatchMode;
use crate::models::{DispatchResult, NotificationRequest};
use crate::state::AppState;

/// Creates the send routes for the given variant.
///
/// Routes:
/// - POST /send-message - Send with explicit or default values
/// - GET /send-random   - Random content to the default token (basic only)
pub fn notification_routes(mode: DispatchMode) -> OpenApiRouter<AppState> {
    let router = OpenApiRouter::new().routes(routes!(send_message));

    match mode {
        DispatchMode::Basic => router.routes(routes!(send_random)),
        DispatchMode::Logged => router,
    }
}

fn respond(result: DispatchResult) -> (StatusCode, Json<SendMessageResponse>) {
    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    (status, Json(result.into()))
}

/// POST /send-message - Send one notification
///
/// A missing body counts as an empty request. A body that is not valid JSON
/// is refused without contacting the provider.
#[utoipa::path(
    post,
    path = "/send-message",
    tag = NOTIFICATION_TAG,
    request_body(content = SendMessageRequest, description = "Optional send parameters"),
    responses(
        (status = 200, description = "Notification sent", body = SendMessageResponse),
        (status = 400, description = "Notification not sent", body = SendMessageResponse)
    )
)]
async fn send_message(
    State(state): State<AppState>,
    OptionalJson(body): OptionalJson<SendMessageRequest>,
) -> (StatusCode, Json<SendMessageResponse>) {
    respond(state.dispatcher.dispatch(NotificationRequest::from(body)).await)
}

/// GET /send-random - Random title and body to the default token
#[utoipa::path(
    get,
    path = "/send-random",
    tag = NOTIFICATION_TAG,
    responses(
        (status = 200, description = "Notification sent", body = SendMessageResponse),
        (status = 400, description = "Notification not sent", body = SendMessageResponse)
    )
)]
async fn send_random(State(state): State<AppState>) -> (StatusCode, Json<SendMessageResponse>) {
    respond(state.dispatcher.dispatch(NotificationRequest::default()).await)
}
