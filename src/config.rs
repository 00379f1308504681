//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Entries store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("paceboard").to_string_lossy().to_string())
        .unwrap_or_else(|| "./paceboard_data".to_string())
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![
                "http://localhost:8084".to_string(),
                "http://127.0.0.1:8084".to_string(),
            ],
        }
    }
}

impl ApiSettings {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// OAuth and session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// OAuth application credentials (from the provider's dev portal)
    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,

    /// Where the callback sends the browser after sign-in
    #[serde(default = "default_ui_origin")]
    pub ui_origin: String,

    #[serde(default = "default_session_ttl")]
    pub session_ttl_hours: i64,
}

fn default_redirect_uri() -> String {
    "http://localhost:8082/auth/callback".to_string()
}

fn default_ui_origin() -> String {
    "http://localhost:8084".to_string()
}

fn default_session_ttl() -> i64 {
    24 * 30
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: default_redirect_uri(),
            ui_origin: default_ui_origin(),
            session_ttl_hours: default_session_ttl(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("paceboard").join("config.toml")),
            Some(PathBuf::from("/etc/paceboard/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(data_dir) = std::env::var("PACEBOARD_DATA_DIR") {
            self.store.data_dir = data_dir;
        }

        if let Ok(host) = std::env::var("PACEBOARD_API_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = std::env::var("PACEBOARD_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        if let Ok(client_id) = std::env::var("PACEBOARD_OAUTH_CLIENT_ID") {
            self.auth.client_id = client_id;
        }
        if let Ok(client_secret) = std::env::var("PACEBOARD_OAUTH_CLIENT_SECRET") {
            self.auth.client_secret = client_secret;
        }
        if let Ok(redirect_uri) = std::env::var("PACEBOARD_OAUTH_REDIRECT_URI") {
            self.auth.redirect_uri = redirect_uri;
        }
        if let Ok(ui_origin) = std::env::var("PACEBOARD_UI_ORIGIN") {
            self.auth.ui_origin = ui_origin;
        }

        if let Ok(level) = std::env::var("PACEBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("PACEBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Paceboard Configuration
#
# Environment variables override these settings:
# - PACEBOARD_DATA_DIR
# - PACEBOARD_API_HOST
# - PACEBOARD_API_PORT
# - PACEBOARD_OAUTH_CLIENT_ID
# - PACEBOARD_OAUTH_CLIENT_SECRET
# - PACEBOARD_OAUTH_REDIRECT_URI
# - PACEBOARD_UI_ORIGIN
# - PACEBOARD_LOG_LEVEL
# - PACEBOARD_LOG_FORMAT

[store]
# Directory for the SQLite database file
data_dir = "~/.local/share/paceboard"

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8082

# Allowed CORS origins (the dashboard's origin)
cors_origins = ["http://localhost:8084", "http://127.0.0.1:8084"]

[auth]
# OAuth 2.0 credentials (get from the provider's developer portal)
client_id = ""
client_secret = ""

# OAuth callback URL, must match the app registration
redirect_uri = "http://localhost:8082/auth/callback"

# Where the browser lands after sign-in
ui_origin = "http://localhost:8084"

# Session lifetime in hours
session_ttl_hours = 720

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.port, 8082);
        assert_eq!(config.auth.session_ttl_hours, 720);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.api.addr(), "0.0.0.0:8082");
        assert_eq!(
            config.auth.redirect_uri,
            "http://localhost:8082/auth/callback"
        );
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[api]\nport = 9000").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.auth.ui_origin, "http://localhost:8084");
    }
}
