//! Request extractors.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::api::dto::SendMessageResponse;
use crate::models::DispatchResult;

/// Rejection for an unreadable or malformed body.
///
/// Rendered as a failed send (`400` with `{success: false, message}`) so
/// clients see a single failure shape.
#[derive(Debug, Error)]
pub enum BodyRejection {
    #[error("Failed to read request body: {0}")]
    Read(String),

    #[error("Invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
}

impl IntoResponse for BodyRejection {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "Rejected request body");
        let body = SendMessageResponse::from(DispatchResult::failed(self.to_string()));
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// JSON body that may be absent.
///
/// An empty (or whitespace-only) body and a literal `null` both yield
/// `T::default()`. The `Content-Type` header is not checked. Anything
/// that is not valid JSON for `T` is rejected as a bad request.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalJson<T>(pub T);

impl<T, S> FromRequest<S> for OptionalJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = BodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| BodyRejection::Read(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(OptionalJson(T::default()));
        }

        let value = serde_json::from_slice::<Option<T>>(&bytes)?;
        Ok(OptionalJson(value.unwrap_or_default()))
    }
}
