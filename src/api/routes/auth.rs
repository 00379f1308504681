//! Auth Routes
//!
//! Sign-in is delegated to the OAuth provider; these endpoints only
//! start the flow, finish it, and manage the resulting session.
//!
//! - GET  /auth/login       - Redirect to the provider authorize URL
//! - GET  /auth/callback    - Complete sign-in, set session cookie
//! - GET  /api/v1/session   - Current user (401 when signed out)
//! - POST /api/v1/logout    - Revoke the session

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::dto::SessionResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::CurrentUser;
use crate::api::state::{AppState, SESSION_COOKIE};

/// GET /auth/login
pub async fn login(State(state): State<Arc<AppState>>) -> Redirect {
    let redirect = state.oauth.begin_login();
    tracing::info!("Starting OAuth sign-in");
    Redirect::temporary(&redirect.url)
}

/// Provider callback query parameters
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    /// Set when the user denied the authorization request
    #[serde(default)]
    pub error: Option<String>,
}

/// GET /auth/callback
pub async fn callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> ApiResult<Response> {
    if let Some(reason) = params.error {
        tracing::warn!(reason = %reason, "OAuth sign-in denied by provider");
        let url = format!("{}/auth?error={}", state.config.auth.ui_origin, reason);
        return Ok(Redirect::temporary(&url).into_response());
    }

    let (code, oauth_state) = match (params.code, params.state) {
        (Some(code), Some(oauth_state)) => (code, oauth_state),
        _ => {
            return Err(ApiError::Validation(
                "Callback is missing code or state".to_string(),
            ))
        }
    };

    let user = state.oauth.complete_login(&oauth_state, &code).await?;
    state.store.upsert_user(&user).await?;

    let session = state
        .sessions
        .create(&user.id, state.session_ttl())
        .await?;

    tracing::info!(user_id = %user.id, handle = %user.handle, "User signed in");

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        session.token,
        state.config.auth.session_ttl_hours * 3600,
    );

    let mut response = Redirect::temporary(&state.config.auth.ui_origin).into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie)
            .map_err(|e| ApiError::Internal(format!("Invalid session cookie: {}", e)))?,
    );

    Ok(response)
}

/// GET /api/v1/session
pub async fn session(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> ApiResult<Json<SessionResponse>> {
    let profile = state
        .store
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {} not found", user.user_id)))?;

    Ok(Json(SessionResponse {
        user: profile.into(),
    }))
}

/// POST /api/v1/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> ApiResult<Response> {
    state.sessions.revoke(&user.token).await?;

    tracing::info!(user_id = %user.user_id, "User signed out");

    // Expire the cookie so the browser drops it too
    let cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE);

    let mut response = StatusCode::NO_CONTENT.into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie)
            .map_err(|e| ApiError::Internal(format!("Invalid session cookie: {}", e)))?,
    );

    Ok(response)
}
