//! The leaderboard workflow: session issuance, score submission and the
//! public ranking.
//!
//! [`LeaderboardService`] owns an explicit store handle; handlers reach it
//! through [`AppState`](crate::state::AppState).

mod issuer;
mod ranking;
mod rate_limiter;
mod submission;

pub use issuer::{IssuedSession, SessionRequest};
pub use rate_limiter::RateLimiter;
pub use submission::Submission;

use std::sync::Arc;

use vibe_core::clock::{Clock, SystemClock};
use vibe_core::rate_limit::RateLimitPolicy;
use vibe_store::SharedStore;

pub struct LeaderboardService {
    store: SharedStore,
    limiter: RateLimiter,
    clock: Arc<dyn Clock>,
}

impl LeaderboardService {
    pub fn new(store: SharedStore, policy: RateLimitPolicy) -> Self {
        Self::with_clock(store, policy, Arc::new(SystemClock))
    }

    /// Like [`new`](Self::new), reading the current time from `clock`.
    pub fn with_clock(store: SharedStore, policy: RateLimitPolicy, clock: Arc<dyn Clock>) -> Self {
        let limiter = RateLimiter::new(Arc::clone(&store), policy, Arc::clone(&clock));
        Self {
            store,
            limiter,
            clock,
        }
    }
}
