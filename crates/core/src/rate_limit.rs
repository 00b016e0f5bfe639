//! Fixed-window rate limiting rules.
//!
//! A window is identified by `floor(unix_secs / window_secs)`. Every hit in
//! a window increments one counter key; the counter expires with the window.
//! The store does the increment, this module decides what the count means.

use std::time::Duration;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Default number of requests admitted per window.
pub const DEFAULT_MAX_REQUESTS: u32 = 5;

/// Default window length in seconds.
pub const DEFAULT_WINDOW_SECS: u64 = 60;

/// What a counter is limiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitPurpose {
    /// `PUT /leaderboard` (session issuance).
    SessionIssue,
    /// `POST /leaderboard` (score submission).
    ScoreSubmit,
}

impl RateLimitPurpose {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SessionIssue => "session",
            Self::ScoreSubmit => "submit",
        }
    }
}

/// Requests allowed per fixed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_requests: u32,
    pub window_secs: u64,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_MAX_REQUESTS,
            window_secs: DEFAULT_WINDOW_SECS,
        }
    }
}

impl RateLimitPolicy {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// Index of the window containing `now`.
    pub fn window_index(&self, now: Timestamp) -> i64 {
        now.timestamp().div_euclid(self.window_secs.max(1) as i64)
    }

    /// Counter key for `identifier` in the window containing `now`.
    pub fn counter_key(&self, purpose: RateLimitPurpose, identifier: &str, now: Timestamp) -> String {
        format!(
            "rate_limit:{}:{}:{}",
            purpose.as_str(),
            identifier,
            self.window_index(now)
        )
    }

    /// Decide on a post-increment count: the request that pushes the count
    /// past `max_requests` and every later one in the window are rejected.
    pub fn check(&self, count: u64) -> Result<(), CoreError> {
        if count > u64::from(self.max_requests) {
            Err(CoreError::RateLimited {
                limit: self.max_requests,
                window_secs: self.window_secs,
            })
        } else {
            Ok(())
        }
    }
}
