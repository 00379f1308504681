//! OAuth 2.0 sign-in via Twitter/X
//!
//! The provider implements the protocol; this module only builds the
//! authorize URL (PKCE, S256), exchanges the callback code for an
//! access token, and fetches the signed-in user's profile.

use crate::auth::error::{AuthError, AuthResult};
use crate::store::User;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{distributions::Alphanumeric, Rng};
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

const AUTHORIZE_URL: &str = "https://twitter.com/i/oauth2/authorize";
const TOKEN_URL: &str = "https://api.twitter.com/2/oauth2/token";
const ME_URL: &str = "https://api.twitter.com/2/users/me";

/// How long a started login may wait for its callback
const PENDING_TTL: Duration = Duration::from_secs(600);

/// OAuth application credentials
#[derive(Debug, Clone)]
pub struct OauthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Twitter/X OAuth client
pub struct TwitterOauth {
    client: Client,
    config: OauthConfig,
    pending: Mutex<HashMap<String, PendingLogin>>,
}

struct PendingLogin {
    verifier: String,
    started: Instant,
}

/// A started login: redirect the browser to `url`, keep nothing else
pub struct LoginRedirect {
    pub url: String,
}

impl TwitterOauth {
    pub fn new(config: OauthConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Begin a login: generate state + PKCE pair, remember the
    /// verifier, and return the provider authorize URL
    pub fn begin_login(&self) -> LoginRedirect {
        let state = random_token(32);
        let verifier = random_token(64);
        let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));

        {
            let mut pending = self.pending.lock().unwrap();
            purge_pending(&mut pending);
            pending.insert(
                state.clone(),
                PendingLogin {
                    verifier,
                    started: Instant::now(),
                },
            );
        }

        let url = format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&scope={}&state={}&code_challenge={}&code_challenge_method=S256",
            AUTHORIZE_URL,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode("users.read tweet.read"),
            state,
            challenge,
        );

        LoginRedirect { url }
    }

    /// Complete a login from the provider callback: match the state to
    /// a pending login, exchange the code, and fetch the user profile
    pub async fn complete_login(&self, state: &str, code: &str) -> AuthResult<User> {
        let verifier = {
            let mut pending = self.pending.lock().unwrap();
            purge_pending(&mut pending);
            pending
                .remove(state)
                .map(|p| p.verifier)
                .ok_or(AuthError::InvalidState)?
        };

        let token = self.exchange_code(code, &verifier).await?;
        self.fetch_user(&token).await
    }

    async fn exchange_code(&self, code: &str, verifier: &str) -> AuthResult<String> {
        let response = self
            .client
            .post(TOKEN_URL)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", &self.config.redirect_uri),
                ("code_verifier", verifier),
                ("client_id", &self.config.client_id),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::Provider(format!(
                "Token exchange returned {}",
                response.status()
            )));
        }

        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Parse(e.to_string()))?;

        Ok(token.access_token)
    }

    async fn fetch_user(&self, access_token: &str) -> AuthResult<User> {
        let response = self
            .client
            .get(ME_URL)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::Provider(format!(
                "Profile fetch returned {}",
                response.status()
            )));
        }

        #[derive(Deserialize)]
        struct MeResponse {
            data: MeData,
        }

        #[derive(Deserialize)]
        struct MeData {
            id: String,
            name: String,
            username: String,
        }

        let me: MeResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Parse(e.to_string()))?;

        Ok(User {
            id: me.data.id,
            handle: me.data.username,
            display_name: me.data.name,
        })
    }
}

fn purge_pending(pending: &mut HashMap<String, PendingLogin>) {
    pending.retain(|_, p| p.started.elapsed() < PENDING_TTL);
}

/// Random URL-safe token for state nonces and PKCE verifiers
fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
