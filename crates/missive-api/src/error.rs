//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use missive_auth::AuthError;

/// An error returned by an API handler. Auth-core outcomes map onto their
/// statuses below; response bodies carry only the stable error text.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("bad request: {0}")]
    BadRequest(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Auth(AuthError::Conflict) => StatusCode::CONFLICT,
            ApiError::Auth(AuthError::InvalidCredentials | AuthError::InvalidToken) => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Auth(AuthError::Forbidden) => StatusCode::FORBIDDEN,
            ApiError::Auth(AuthError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Auth(AuthError::Internal(e)) => {
                // Detail stays in the log; the body says only "internal error".
                error!("internal error: {e:#}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Mapping for `spawn_blocking` join failures.
pub(crate) fn join_error(e: tokio::task::JoinError) -> ApiError {
    ApiError::Auth(AuthError::Internal(anyhow::anyhow!(
        "blocking task failed: {e}"
    )))
}
