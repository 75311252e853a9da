use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use missive_auth::NewCredential;
use missive_types::api::{LoginRequest, LoginResponse, RegisterRequest};

use crate::AppState;
use crate::error::{ApiError, join_error};

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Validate input
    if req.username.len() < 3 || req.username.len() > 32 {
        return Err(ApiError::BadRequest("username must be 3-32 characters"));
    }
    if req.password.len() < 8 {
        return Err(ApiError::BadRequest("password must be at least 8 characters"));
    }

    // Argon2 is CPU-bound; run registration off the async runtime.
    let app = state.clone();
    let credential = tokio::task::spawn_blocking(move || {
        app.authenticator.register(NewCredential {
            username: req.username,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone,
        })
    })
    .await
    .map_err(join_error)??;

    Ok((StatusCode::CREATED, Json(credential)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let app = state.clone();
    let token =
        tokio::task::spawn_blocking(move || app.authenticator.login(&req.username, &req.password))
            .await
            .map_err(join_error)??;

    Ok(Json(LoginResponse { token }))
}
