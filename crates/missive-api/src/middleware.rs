use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use missive_auth::AuthError;

use crate::{AppState, error::ApiError};

/// Extract and verify the bearer token from the Authorization header,
/// inserting the decoded claims as a request extension. The verifying
/// secret comes from the app state built at startup, never from the
/// environment at request time.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::InvalidToken)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidToken)?;

    let claims = state.tokens.verify(token)?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
