#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::time::Instant;
use tower::ServiceExt;
use vibe_api::config::ServerConfig;
use vibe_api::leaderboard::LeaderboardService;
use vibe_api::router::build_app_router;
use vibe_api::state::AppState;
use vibe_core::clock::Clock;
use vibe_core::rate_limit::RateLimitPolicy;
use vibe_core::types::Timestamp;
use vibe_store::{MemoryStore, SharedStore};

/// Client IP used by helpers unless a test passes its own.
pub const TEST_IP: &str = "203.0.113.10";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:3000` as CORS origin (matching the dev default),
/// a 30-second request timeout and the default 5-per-60s rate limit.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        redis_url: None,
        rate_limit: RateLimitPolicy::default(),
    }
}

/// Build the full application router over a fresh in-memory store.
///
/// The store handle is returned as well so tests can seed or inspect state
/// directly.
pub fn build_test_app() -> (Router, Arc<MemoryStore>) {
    build_test_app_with(test_config())
}

pub fn build_test_app_with(config: ServerConfig) -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone(), config.clone());
    (build_app_router(state, &config), store)
}

/// Build the router over any store, e.g. one that fails on purpose.
pub fn build_test_app_over(store: SharedStore) -> Router {
    let config = test_config();
    let state = AppState::new(store, config.clone());
    build_app_router(state, &config)
}

/// Wall clock that advances with tokio's clock, so `tokio::time::advance`
/// moves session expiry and the in-memory TTLs together.
pub struct TokioClock {
    wall: Timestamp,
    start: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            wall: Utc::now(),
            start: Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Timestamp {
        let elapsed = chrono::Duration::from_std(self.start.elapsed()).unwrap();
        self.wall + elapsed
    }
}

/// Build the router over a fresh in-memory store with time driven by
/// tokio's (usually paused) clock.
pub fn build_test_app_on_tokio_clock() -> (Router, Arc<MemoryStore>) {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    let leaderboard = LeaderboardService::with_clock(
        store.clone(),
        config.rate_limit,
        Arc::new(TokioClock::new()),
    );
    let state = AppState {
        store: store.clone(),
        config: Arc::new(config.clone()),
        leaderboard: Arc::new(leaderboard),
    };
    (build_app_router(state, &config), store)
}

/// Send a request with an optional JSON body from `ip`.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    ip: &str,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-forwarded-for", ip);

    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, TEST_IP, None).await
}

pub async fn put_json(app: Router, uri: &str, ip: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, ip, Some(body)).await
}

pub async fn post_json(app: Router, uri: &str, ip: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, ip, Some(body)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Issue a session through `PUT /api/leaderboard` and return its token.
pub async fn issue_token(app: Router, ip: &str) -> String {
    let response = put_json(
        app,
        "/api/leaderboard",
        ip,
        serde_json::json!({
            "gameType": "prompt-golf",
            "originalPrompt": "draw a red circle",
            "userPrompt": "make a circle that is red",
        }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    body_json(response).await["sessionToken"]
        .as_str()
        .unwrap()
        .to_string()
}
