use vibe_core::rate_limit::{RateLimitPolicy, DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW_SECS};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Redis connection URL. When unset the server runs on the in-memory store.
    pub redis_url: Option<String>,
    /// Fixed-window limit applied to session issuance and score submission.
    pub rate_limit: RateLimitPolicy,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `HOST`                    | `0.0.0.0`               |
    /// | `PORT`                    | `3000`                  |
    /// | `CORS_ORIGINS`            | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                    |
    /// | `REDIS_URL`               | unset (in-memory store) |
    /// | `RATE_LIMIT_MAX_REQUESTS` | `5`                     |
    /// | `RATE_LIMIT_WINDOW_SECS`  | `60`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let redis_url = std::env::var("REDIS_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let max_requests: u32 = std::env::var("RATE_LIMIT_MAX_REQUESTS")
            .unwrap_or_else(|_| DEFAULT_MAX_REQUESTS.to_string())
            .parse()
            .expect("RATE_LIMIT_MAX_REQUESTS must be a valid u32");

        let window_secs: u64 = std::env::var("RATE_LIMIT_WINDOW_SECS")
            .unwrap_or_else(|_| DEFAULT_WINDOW_SECS.to_string())
            .parse()
            .expect("RATE_LIMIT_WINDOW_SECS must be a valid u64");
        assert!(window_secs > 0, "RATE_LIMIT_WINDOW_SECS must be positive");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            redis_url,
            rate_limit: RateLimitPolicy {
                max_requests,
                window_secs,
            },
        }
    }
}
