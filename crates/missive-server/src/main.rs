use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use missive_api::{AppState, AppStateInner};
use missive_auth::{AuthConfig, Authenticator, PasswordHasher, TokenService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "missive=debug,tower_http=debug".into()),
        )
        .init();

    // Config — read once here, then passed down as immutable values.
    let auth_config = AuthConfig {
        token_secret: std::env::var("MISSIVE_TOKEN_SECRET")
            .unwrap_or_else(|_| "dev-secret-change-me".into()),
        work_factor: std::env::var("MISSIVE_WORK_FACTOR")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(AuthConfig::DEFAULT_WORK_FACTOR),
    };
    let db_path = std::env::var("MISSIVE_DB_PATH").unwrap_or_else(|_| "missive.db".into());
    let host = std::env::var("MISSIVE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("MISSIVE_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Init database
    let db = Arc::new(missive_db::Database::open(&PathBuf::from(&db_path))?);

    // Auth core
    let tokens = Arc::new(TokenService::new(&auth_config.token_secret));
    let hasher = PasswordHasher::new(auth_config.work_factor)?;
    let authenticator = Authenticator::new(db.clone(), hasher, tokens.clone());

    // Shared state
    let state: AppState = Arc::new(AppStateInner {
        db,
        authenticator,
        tokens,
    });

    let app = missive_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Missive server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
