use std::sync::Arc;

use vibe_core::clock::Clock;
use vibe_core::rate_limit::{RateLimitPolicy, RateLimitPurpose};
use vibe_store::SharedStore;

use crate::error::AppResult;

/// Fixed-window limiter backed by the store's atomic counter.
///
/// The count returned by the increment is the only input to the decision,
/// so concurrent requests cannot both observe a stale count.
pub struct RateLimiter {
    store: SharedStore,
    policy: RateLimitPolicy,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(store: SharedStore, policy: RateLimitPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            policy,
            clock,
        }
    }

    /// Count one request from `identifier` and reject it if the current
    /// window is already full.
    pub async fn check(&self, purpose: RateLimitPurpose, identifier: &str) -> AppResult<()> {
        let key = self.policy.counter_key(purpose, identifier, self.clock.now());
        let count = self.store.hit_counter(&key, self.policy.window()).await?;

        if let Err(err) = self.policy.check(count) {
            tracing::warn!(
                purpose = purpose.as_str(),
                identifier,
                count,
                "Rate limit exceeded"
            );
            return Err(err.into());
        }
        Ok(())
    }
}
