//! HTTP surface: axum handlers, the bearer-token middleware, and the error
//! to status-code mapping. Transport and TLS are the caller's concern.

pub mod auth;
pub mod error;
pub mod messages;
pub mod middleware;
pub mod users;

use std::sync::Arc;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use missive_auth::{Authenticator, TokenService};
use missive_db::Database;

pub use error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Arc<Database>,
    pub authenticator: Authenticator,
    pub tokens: Arc<TokenService>,
}

/// Build the full application router: public auth routes plus the
/// token-guarded user and message routes.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .with_state(state.clone());

    let protected = Router::new()
        .route("/users", get(users::list))
        .route("/users/{username}", get(users::get_one))
        .route("/users/{username}/messages/to", get(users::messages_to))
        .route("/users/{username}/messages/from", get(users::messages_from))
        .route("/messages", post(messages::send))
        .route("/messages/{id}", get(messages::get_one))
        .route("/messages/{id}/read", post(messages::mark_read))
        .layer(from_fn_with_state(state.clone(), middleware::require_auth))
        .with_state(state);

    Router::new().merge(public).merge(protected)
}

pub(crate) fn profile(row: missive_db::models::ProfileRow) -> missive_types::models::Profile {
    missive_types::models::Profile {
        username: row.username,
        first_name: row.first_name,
        last_name: row.last_name,
        phone: row.phone,
    }
}
