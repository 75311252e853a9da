use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use missive_auth::{AuthError, Caller, guard};
use missive_db::{models::MessageDetailRow, queries::is_constraint_violation};
use missive_types::api::{Claims, MessageDetail, MessageSummary, ReadReceipt, SendMessageRequest};

use crate::error::{ApiError, join_error};
use crate::{AppState, profile};

/// Message detail with both participant profiles expanded. Existence first
/// (missing id is 404), then the visibility rule (either participant).
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<MessageDetail>, ApiError> {
    let caller = Caller::User(claims.sub);

    let app = state.clone();
    let detail = tokio::task::spawn_blocking(move || app.db.get_message(id))
        .await
        .map_err(join_error)?
        .map_err(AuthError::from)?
        .ok_or(AuthError::NotFound)?;

    guard::ensure_can_view(
        &caller,
        &detail.message.from_username,
        &detail.message.to_username,
    )?;

    Ok(Json(detail_response(detail)))
}

/// Create a message. The sender is always the authenticated caller — the
/// request body cannot spoof `from_username`.
pub async fn send(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.body.trim().is_empty() {
        return Err(ApiError::BadRequest("message body must not be empty"));
    }

    let from_username = claims.sub;
    let sent_at = Utc::now();

    let app = state.clone();
    let from = from_username.clone();
    let to = req.to_username.clone();
    let body = req.body.clone();
    let id = tokio::task::spawn_blocking(move || -> Result<i64, AuthError> {
        if app.db.get_user_by_username(&to)?.is_none() {
            return Err(AuthError::NotFound);
        }
        match app.db.insert_message(&from, &to, &body, sent_at) {
            Ok(id) => Ok(id),
            // Recipient deleted between the check and the insert.
            Err(e) if is_constraint_violation(&e) => Err(AuthError::NotFound),
            Err(e) => Err(e.into()),
        }
    })
    .await
    .map_err(join_error)??;

    Ok((
        StatusCode::CREATED,
        Json(MessageSummary {
            id,
            from_username,
            to_username: req.to_username,
            body: req.body,
            sent_at,
        }),
    ))
}

/// Read acknowledgement. Narrower than visibility: only the recipient.
/// Idempotent — a repeat call returns the original timestamp.
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ReadReceipt>, ApiError> {
    let caller = Caller::User(claims.sub);

    let app = state.clone();
    let detail = tokio::task::spawn_blocking(move || app.db.get_message(id))
        .await
        .map_err(join_error)?
        .map_err(AuthError::from)?
        .ok_or(AuthError::NotFound)?;

    guard::ensure_can_mark_read(&caller, &detail.message.to_username)?;

    let app = state.clone();
    let read_at = tokio::task::spawn_blocking(move || app.db.mark_message_read(id, Utc::now()))
        .await
        .map_err(join_error)?
        .map_err(AuthError::from)?
        .ok_or(AuthError::NotFound)?;

    Ok(Json(ReadReceipt { id, read_at }))
}

fn detail_response(row: MessageDetailRow) -> MessageDetail {
    MessageDetail {
        id: row.message.id,
        body: row.message.body,
        sent_at: row.message.sent_at,
        read_at: row.message.read_at,
        from_user: profile(row.from_user),
        to_user: profile(row.to_user),
    }
}
