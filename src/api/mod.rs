//! Paceboard REST API
//!
//! HTTP API layer built with Axum.
//!
//! # Endpoints
//!
//! ## Auth
//! - `GET /auth/login` - Redirect to the OAuth provider
//! - `GET /auth/callback` - Complete sign-in, set session cookie
//! - `GET /api/v1/session` - Current user
//! - `POST /api/v1/logout` - Sign out
//!
//! ## Entries
//! - `GET /api/v1/entries` - List the caller's entries
//! - `POST /api/v1/entries` - Create an entry
//! - `PUT /api/v1/entries/:id` - Update an entry
//! - `DELETE /api/v1/entries/:id` - Delete an entry
//!
//! ## Reports
//! - `GET /api/v1/reports/monthly` - Trailing 12-month report
//! - `GET /api/v1/reports/categories` - Category totals for a range
//!
//! ## Export
//! - `GET /api/v1/export` - CSV download
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status

pub mod dto;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use extract::CurrentUser;
pub use state::{AppState, SESSION_COOKIE};

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.api.cors_origins);

    let api_routes = Router::new()
        // Session routes
        .route("/session", get(routes::auth::session))
        .route("/logout", post(routes::auth::logout))
        // Entry routes
        .route("/entries", get(routes::entries::list_entries))
        .route("/entries", post(routes::entries::create_entry))
        .route("/entries/:id", put(routes::entries::update_entry))
        .route("/entries/:id", delete(routes::entries::delete_entry))
        // Report routes
        .route("/reports/monthly", get(routes::reports::monthly))
        .route("/reports/categories", get(routes::reports::categories))
        // Export route
        .route("/export", get(routes::export::export_entries));

    let auth_routes = Router::new()
        .route("/login", get(routes::auth::login))
        .route("/callback", get(routes::auth::callback));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/auth", auth_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// CORS for the dashboard origin; session cookies need credentials,
/// so wildcard origins only apply when none are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

    if parsed.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(parsed))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true)
    }
}

/// Start the API server
pub async fn serve(state: AppState) -> Result<(), ApiError> {
    let addr = state.config.api.addr();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Paceboard API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Paceboard API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{OauthConfig, SessionStore, TwitterOauth};
    use crate::config::Config;
    use crate::store::{EntryStore, User};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    struct TestContext {
        app: Router,
        store: Arc<EntryStore>,
        sessions: Arc<SessionStore>,
    }

    fn create_test_app() -> TestContext {
        let store = Arc::new(EntryStore::open_in_memory().unwrap());
        let sessions = Arc::new(SessionStore::open_in_memory().unwrap());
        let oauth = Arc::new(TwitterOauth::new(OauthConfig {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            redirect_uri: "http://localhost:8082/auth/callback".to_string(),
        }));

        let state = AppState::new(
            Arc::clone(&store),
            Arc::clone(&sessions),
            oauth,
            Config::default(),
        );

        TestContext {
            app: build_router(state),
            store,
            sessions,
        }
    }

    async fn sign_in(ctx: &TestContext, user_id: &str) -> String {
        ctx.store
            .upsert_user(&User {
                id: user_id.to_string(),
                handle: user_id.to_string(),
                display_name: user_id.to_string(),
            })
            .await
            .unwrap();

        ctx.sessions
            .create(user_id, chrono::Duration::hours(1))
            .await
            .unwrap()
            .token
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn json_request(method: &str, uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let ctx = create_test_app();

        for uri in ["/health/live", "/health/ready", "/health"] {
            let response = ctx.app.clone().oneshot(get(uri, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{} failed", uri);
        }
    }

    #[tokio::test]
    async fn test_protected_routes_require_auth() {
        let ctx = create_test_app();

        for uri in [
            "/api/v1/entries",
            "/api/v1/session",
            "/api/v1/reports/monthly",
            "/api/v1/export",
        ] {
            let response = ctx.app.clone().oneshot(get(uri, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_login_redirects_to_provider() {
        let ctx = create_test_app();

        let response = ctx.app.clone().oneshot(get("/auth/login", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

        let location = response.headers().get("location").unwrap().to_str().unwrap();
        assert!(location.starts_with("https://twitter.com/i/oauth2/authorize"));
        assert!(location.contains("code_challenge_method=S256"));
    }

    #[tokio::test]
    async fn test_session_returns_current_user() {
        let ctx = create_test_app();
        let token = sign_in(&ctx, "alice").await;

        let response = ctx
            .app
            .clone()
            .oneshot(get("/api/v1/session", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["user"]["handle"], "alice");
    }

    #[tokio::test]
    async fn test_session_cookie_authenticates() {
        let ctx = create_test_app();
        let token = sign_in(&ctx, "alice").await;

        let request = Request::builder()
            .uri("/api/v1/session")
            .header("Cookie", format!("{}={}", SESSION_COOKIE, token))
            .body(Body::empty())
            .unwrap();

        let response = ctx.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_logout_revokes_session() {
        let ctx = create_test_app();
        let token = sign_in(&ctx, "alice").await;

        let response = ctx
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/logout")
                    .header("Authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = ctx
            .app
            .clone()
            .oneshot(get("/api/v1/session", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_entry_crud_round_trip() {
        let ctx = create_test_app();
        let token = sign_in(&ctx, "alice").await;

        // Create
        let response = ctx
            .app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/entries",
                &token,
                serde_json::json!({
                    "date": "2024-01-15",
                    "entry_type": "sales",
                    "category": "Training",
                    "amount": 2500.0,
                    "title": "Workshop deposit"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        let id = created["id"].as_i64().unwrap();
        assert_eq!(created["category"], "Training");

        // List includes it with identical fields
        let response = ctx
            .app
            .clone()
            .oneshot(get("/api/v1/entries", Some(&token)))
            .await
            .unwrap();
        let listed = body_json(response).await;
        assert_eq!(listed["total"], 1);
        assert_eq!(listed["entries"][0]["date"], "2024-01-15");
        assert_eq!(listed["entries"][0]["amount"], 2500.0);
        assert_eq!(listed["entries"][0]["title"], "Workshop deposit");

        // Update
        let response = ctx
            .app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/v1/entries/{}", id),
                &token,
                serde_json::json!({ "amount": 2600.0 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated = body_json(response).await;
        assert_eq!(updated["amount"], 2600.0);
        assert_eq!(updated["title"], "Workshop deposit");

        // Delete
        let response = ctx
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/v1/entries/{}", id))
                    .header("Authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = ctx
            .app
            .clone()
            .oneshot(get("/api/v1/entries", Some(&token)))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["total"], 0);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let ctx = create_test_app();
        let token = sign_in(&ctx, "alice").await;

        // Empty title
        let response = ctx
            .app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/entries",
                &token,
                serde_json::json!({
                    "date": "2024-01-15",
                    "entry_type": "sales",
                    "category": "Training",
                    "amount": 100.0,
                    "title": "   "
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");

        // Unknown category
        let response = ctx
            .app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/entries",
                &token,
                serde_json::json!({
                    "date": "2024-01-15",
                    "entry_type": "sales",
                    "category": "Consulting",
                    "amount": 100.0,
                    "title": "x"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_entries_are_isolated_between_users() {
        let ctx = create_test_app();
        let alice = sign_in(&ctx, "alice").await;
        let bob = sign_in(&ctx, "bob").await;

        let response = ctx
            .app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/entries",
                &alice,
                serde_json::json!({
                    "date": "2024-01-15",
                    "entry_type": "delivery",
                    "category": "Coaching",
                    "amount": 1800.0,
                    "title": "Session block"
                }),
            ))
            .await
            .unwrap();
        let id = body_json(response).await["id"].as_i64().unwrap();

        // Bob cannot see or delete Alice's entry
        let response = ctx
            .app
            .clone()
            .oneshot(get("/api/v1/entries", Some(&bob)))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["total"], 0);

        let response = ctx
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/v1/entries/{}", id))
                    .header("Authorization", format!("Bearer {}", bob))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Alice still has it
        let response = ctx
            .app
            .clone()
            .oneshot(get("/api/v1/entries", Some(&alice)))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["total"], 1);
    }

    #[tokio::test]
    async fn test_monthly_report() {
        let ctx = create_test_app();
        let token = sign_in(&ctx, "alice").await;

        for (ty, category, amount) in [
            ("sales", "Training", 2500.0),
            ("delivery", "Coaching", 1800.0),
        ] {
            ctx.app
                .clone()
                .oneshot(json_request(
                    "POST",
                    "/api/v1/entries",
                    &token,
                    serde_json::json!({
                        "date": "2024-01-15",
                        "entry_type": ty,
                        "category": category,
                        "amount": amount,
                        "title": "entry"
                    }),
                ))
                .await
                .unwrap();
        }

        let response = ctx
            .app
            .clone()
            .oneshot(get(
                "/api/v1/reports/monthly?anchor=2024-06-15",
                Some(&token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let report = body_json(response).await;
        assert_eq!(report["months"].as_array().unwrap().len(), 12);
        assert_eq!(report["sales"]["total"], 2500.0);
        assert_eq!(report["delivery"]["total"], 1800.0);
    }

    #[tokio::test]
    async fn test_category_report_filters_by_range() {
        let ctx = create_test_app();
        let token = sign_in(&ctx, "alice").await;

        for date in ["2024-01-15", "2024-03-15"] {
            ctx.app
                .clone()
                .oneshot(json_request(
                    "POST",
                    "/api/v1/entries",
                    &token,
                    serde_json::json!({
                        "date": date,
                        "entry_type": "sales",
                        "category": "Speaking",
                        "amount": 750.0,
                        "title": "Keynote"
                    }),
                ))
                .await
                .unwrap();
        }

        let response = ctx
            .app
            .clone()
            .oneshot(get(
                "/api/v1/reports/categories?type=sales&start=2024-03-01&end=2024-03-31",
                Some(&token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let speaking = json["totals"]
            .as_array()
            .unwrap()
            .iter()
            .find(|t| t["category"] == "Speaking")
            .unwrap();
        assert_eq!(speaking["total"], 750.0); // January entry filtered out
    }

    #[tokio::test]
    async fn test_export_returns_csv() {
        let ctx = create_test_app();
        let token = sign_in(&ctx, "alice").await;

        let response = ctx
            .app
            .clone()
            .oneshot(get("/api/v1/export", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/csv"));
    }
}
