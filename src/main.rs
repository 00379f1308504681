//! Paceboard API Server
//!
//! Run with: cargo run --bin paceboard
//!
//! # Configuration
//!
//! Reads `config.toml` from the usual locations (see [`paceboard::config`])
//! with environment overrides:
//! - `PACEBOARD_DATA_DIR`: Data directory
//! - `PACEBOARD_API_HOST` / `PACEBOARD_API_PORT`: Bind address
//! - `PACEBOARD_OAUTH_CLIENT_ID` / `PACEBOARD_OAUTH_CLIENT_SECRET`: OAuth app
//! - `PACEBOARD_OAUTH_REDIRECT_URI`: OAuth callback URL
//! - `PACEBOARD_UI_ORIGIN`: Where the callback sends the browser
//! - `RUST_LOG`: Log level (default: info)

use paceboard::api::{serve, AppState};
use paceboard::auth::{OauthConfig, SessionStore, TwitterOauth};
use paceboard::config::Config;
use paceboard::store::{EntryStore, StoreConfig};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paceboard=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Paceboard API server v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load_default();
    let store_config = StoreConfig::new(&config.store.data_dir);

    tracing::info!("Data directory: {:?}", store_config.data_dir);

    if config.auth.client_id.is_empty() {
        tracing::warn!(
            "PACEBOARD_OAUTH_CLIENT_ID is not set; sign-in will fail until OAuth is configured"
        );
    }

    // Open the entries store and the session store on the same database
    let store = Arc::new(EntryStore::open(&store_config)?);
    let sessions = Arc::new(SessionStore::open(&store_config.db_path())?);

    let oauth = Arc::new(TwitterOauth::new(OauthConfig {
        client_id: config.auth.client_id.clone(),
        client_secret: config.auth.client_secret.clone(),
        redirect_uri: config.auth.redirect_uri.clone(),
    }));

    // Sweep stale sessions once at startup
    match sessions.purge_expired().await {
        Ok(0) => {}
        Ok(n) => tracing::info!("Purged {} expired sessions", n),
        Err(e) => tracing::warn!("Session purge failed: {}", e),
    }

    let addr = config.api.addr();
    tracing::info!("Starting server on {}", addr);

    let state = AppState::new(store, sessions, oauth, config);
    serve(state).await?;

    tracing::info!("Paceboard API server stopped");
    Ok(())
}
