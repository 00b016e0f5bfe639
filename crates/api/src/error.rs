use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use vibe_core::error::CoreError;
use vibe_store::StoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for backend
/// failures. Implements [`IntoResponse`] to produce consistent JSON error
/// responses of the form `{ "error": ..., "code": ... }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `vibe_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A store backend failure.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A malformed request body, with the extractor's message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut retry_after = None;

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::RateLimited { window_secs, .. } => {
                    retry_after = Some(*window_secs);
                    (
                        StatusCode::TOO_MANY_REQUESTS,
                        "RATE_LIMITED",
                        "Too many requests. Please try again later.".to_string(),
                    )
                }
                CoreError::InvalidToken => (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_TOKEN",
                    "Invalid session token".to_string(),
                ),
                CoreError::SessionNotFound => (
                    StatusCode::UNAUTHORIZED,
                    "SESSION_NOT_FOUND",
                    "Session not found".to_string(),
                ),
                CoreError::SessionExpired => (
                    StatusCode::UNAUTHORIZED,
                    "SESSION_EXPIRED",
                    "Session expired".to_string(),
                ),
                CoreError::SessionAlreadyUsed => (
                    StatusCode::UNAUTHORIZED,
                    "SESSION_ALREADY_USED",
                    "Session already used".to_string(),
                ),
                CoreError::InvalidName(msg) => {
                    (StatusCode::BAD_REQUEST, "INVALID_NAME", msg.clone())
                }
                CoreError::InvalidScore(msg) => {
                    (StatusCode::BAD_REQUEST, "INVALID_SCORE", msg.clone())
                }
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
            },

            // --- Store errors ---
            AppError::Store(err) => {
                tracing::error!(error = %err, "Store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR",
                    "An internal error occurred".to_string(),
                )
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        let mut response = (status, axum::Json(body)).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}
