//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::auth::{SessionStore, TwitterOauth};
use crate::config::Config;
use crate::store::EntryStore;
use std::sync::Arc;
use std::time::Instant;

/// Name of the session cookie set by the OAuth callback
pub const SESSION_COOKIE: &str = "paceboard_session";

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Entries store
    pub store: Arc<EntryStore>,
    /// Session store
    pub sessions: Arc<SessionStore>,
    /// OAuth provider client
    pub oauth: Arc<TwitterOauth>,
    /// Full application configuration
    pub config: Arc<Config>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        store: Arc<EntryStore>,
        sessions: Arc<SessionStore>,
        oauth: Arc<TwitterOauth>,
        config: Config,
    ) -> Self {
        Self {
            store,
            sessions,
            oauth,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Session lifetime from configuration
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.config.auth.session_ttl_hours)
    }
}
