//! Client IP extractor for Axum handlers.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

/// Identifier used when no proxy header names the client.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// The caller's IP as reported by the fronting proxy.
///
/// Resolution order: first entry of `X-Forwarded-For`, then `X-Real-IP`,
/// then [`UNKNOWN_CLIENT`]. Never rejects.
///
/// ```ignore
/// async fn my_handler(ClientIp(ip): ClientIp) -> String {
///     ip
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl ClientIp {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|s| !s.is_empty())
        };

        let forwarded = header("x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let ip = forwarded
            .or_else(|| header("x-real-ip"))
            .unwrap_or(UNKNOWN_CLIENT);
        Self(ip.to_string())
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}
