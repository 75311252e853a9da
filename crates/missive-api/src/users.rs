use axum::{
    Extension, Json,
    extract::{Path, State},
};

use missive_auth::{AuthError, Caller, authenticator::credential_from_row, guard};
use missive_types::api::{Claims, ReceivedMessage, SentMessage};
use missive_types::models::{Credential, Profile};

use crate::error::{ApiError, join_error};
use crate::{AppState, profile};

/// Basic profile listing, visible to any authenticated user.
pub async fn list(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<Vec<Profile>>, ApiError> {
    let app = state.clone();
    let rows = tokio::task::spawn_blocking(move || app.db.list_users())
        .await
        .map_err(join_error)?
        .map_err(AuthError::from)?;

    Ok(Json(rows.into_iter().map(profile).collect()))
}

/// Full profile including join/login timestamps. Correct-user rule: only
/// the account owner may fetch it.
pub async fn get_one(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Credential>, ApiError> {
    let caller = Caller::User(claims.sub);
    guard::ensure_correct_user(&caller, &username)?;

    let app = state.clone();
    let row = tokio::task::spawn_blocking(move || app.db.get_user_by_username(&username))
        .await
        .map_err(join_error)?
        .map_err(AuthError::from)?
        .ok_or(AuthError::NotFound)?;

    Ok(Json(credential_from_row(row)))
}

/// Messages received by a user, sender profiles expanded. Owner only.
pub async fn messages_to(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<ReceivedMessage>>, ApiError> {
    let caller = Caller::User(claims.sub);
    guard::ensure_correct_user(&caller, &username)?;

    let app = state.clone();
    let rows = tokio::task::spawn_blocking(move || app.db.messages_to(&username))
        .await
        .map_err(join_error)?
        .map_err(AuthError::from)?;

    let messages = rows
        .into_iter()
        .map(|row| ReceivedMessage {
            id: row.id,
            from_user: profile(row.counterpart),
            body: row.body,
            sent_at: row.sent_at,
            read_at: row.read_at,
        })
        .collect();

    Ok(Json(messages))
}

/// Messages sent by a user, recipient profiles expanded. Owner only.
pub async fn messages_from(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<SentMessage>>, ApiError> {
    let caller = Caller::User(claims.sub);
    guard::ensure_correct_user(&caller, &username)?;

    let app = state.clone();
    let rows = tokio::task::spawn_blocking(move || app.db.messages_from(&username))
        .await
        .map_err(join_error)?
        .map_err(AuthError::from)?;

    let messages = rows
        .into_iter()
        .map(|row| SentMessage {
            id: row.id,
            to_user: profile(row.counterpart),
            body: row.body,
            sent_at: row.sent_at,
            read_at: row.read_at,
        })
        .collect();

    Ok(Json(messages))
}
