//! HTTP API server

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::account::AccountService;
use crate::auth::{BcryptHasher, SessionManager, TokenIssuer};
use crate::config::Config;
use crate::error::Result;
use crate::store::{self, AccountStore, RetryPolicy};

use super::routes;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub service: AccountService,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Wire the service around an already constructed store
    pub fn with_store(config: Config, store: Arc<dyn AccountStore>) -> Result<Self> {
        config.validate()?;

        let issuer = Arc::new(TokenIssuer::new(config.auth.node_id)?);
        let hasher = Arc::new(BcryptHasher::new(config.auth.bcrypt_cost));
        let sessions = SessionManager::new(config.auth.session_ttl());
        let retry = RetryPolicy::from_config(&config.database);

        let service = AccountService::new(store, hasher, issuer, sessions, retry)?;
        Ok(Self { config, service })
    }

    /// Connect the configured store and wire the service
    pub async fn connect(config: Config) -> Result<Self> {
        let store = store::connect(&config.database).await?;
        Self::with_store(config, store)
    }
}

/// Run the HTTP API server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::connect(config).await?);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    serve(listener, state).await
}

/// Serve the API on an already bound listener
pub async fn serve(listener: TcpListener, state: SharedState) -> Result<()> {
    let cleanup = state
        .service
        .sessions()
        .spawn_cleanup(state.config.auth.cleanup_interval());

    let app = create_router(state);
    let result = axum::serve(listener, app).await;

    cleanup.abort();
    result?;
    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    let max_body_bytes = state.config.server.max_body_bytes;

    Router::new()
        .route("/health", get(routes::health))
        .route("/login", post(routes::login))
        .route("/register", post(routes::register))
        .route("/viewprofile", post(routes::view_profile))
        // Middleware
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
