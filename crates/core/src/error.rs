/// Domain errors raised by the leaderboard workflow.
///
/// Each variant maps to exactly one HTTP status in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Too many requests: limit is {limit} per {window_secs}s")]
    RateLimited { limit: u32, window_secs: u64 },

    #[error("Invalid session token")]
    InvalidToken,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Session expired")]
    SessionExpired,

    #[error("Session already used")]
    SessionAlreadyUsed,

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid score: {0}")]
    InvalidScore(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}
