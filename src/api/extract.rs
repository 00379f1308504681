//! Request extractors
//!
//! `CurrentUser` authenticates a request from its session cookie or
//! bearer token. Handlers that take it are protected: missing,
//! invalid, or expired sessions are rejected with 401 before the
//! handler body runs.

use axum::{async_trait, extract::FromRequestParts, http::header, http::request::Parts};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::state::{AppState, SESSION_COOKIE};

/// The authenticated caller
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: String,
    /// The session token the request authenticated with
    pub token: String,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .or_else(|| cookie_token(parts))
            .ok_or(ApiError::Unauthorized)?;

        let session = state
            .sessions
            .lookup(&token)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        Ok(CurrentUser {
            user_id: session.user_id,
            token,
        })
    }
}

/// `Authorization: Bearer <token>`
fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// `Cookie: paceboard_session=<token>`
fn cookie_token(parts: &Parts) -> Option<String> {
    let cookies = parts.headers.get(header::COOKIE)?.to_str().ok()?;

    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header_name: header::HeaderName, value: &str) -> Parts {
        let request = Request::builder()
            .header(header_name, value)
            .body(())
            .unwrap();
        request.into_parts().0
    }

    #[test]
    fn test_bearer_token() {
        let parts = parts_with(header::AUTHORIZATION, "Bearer abc123");
        assert_eq!(bearer_token(&parts), Some("abc123".to_string()));

        let parts = parts_with(header::AUTHORIZATION, "Basic abc123");
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_cookie_token() {
        let parts = parts_with(header::COOKIE, "theme=dark; paceboard_session=tok-1; a=b");
        assert_eq!(cookie_token(&parts), Some("tok-1".to_string()));

        let parts = parts_with(header::COOKIE, "theme=dark");
        assert_eq!(cookie_token(&parts), None);
    }
}
