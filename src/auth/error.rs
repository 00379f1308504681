//! Auth error types

use thiserror::Error;

/// Errors that can occur during sign-in or session handling
#[derive(Error, Debug)]
pub enum AuthError {
    /// The provider rejected or failed the request
    #[error("Provider error: {0}")]
    Provider(String),

    /// Network failure talking to the provider
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider response could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Callback state does not match a pending login
    #[error("Unknown or expired login state")]
    InvalidState,

    /// Session database failure
    #[error("Session store error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// I/O failure creating the database directory
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for auth operations
pub type AuthResult<T> = Result<T, AuthError>;
