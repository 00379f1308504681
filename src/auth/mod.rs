//! Authentication
//!
//! OAuth 2.0 sign-in delegated to Twitter/X plus opaque session
//! tokens persisted in SQLite. The API layer authenticates every
//! protected request through [`SessionStore::lookup`].

pub mod error;
pub mod provider;
pub mod session;

pub use error::{AuthError, AuthResult};
pub use provider::{LoginRedirect, OauthConfig, TwitterOauth};
pub use session::{Session, SessionStore};
