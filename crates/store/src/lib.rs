//! Persistence for leaderboard sessions, rate-limit counters and scores.
//!
//! Every backend implements [`LeaderboardStore`]. Handlers receive an
//! `Arc<dyn LeaderboardStore>` through application state; nothing in this
//! crate holds a global client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use vibe_core::session::{SessionRecord, SessionToken};
use vibe_core::types::{Score, Timestamp, TotalScore};

pub mod error;
pub mod keys;
pub mod memory;
pub mod redis_store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;

/// Shared handle to whichever backend the server was started with.
pub type SharedStore = Arc<dyn LeaderboardStore>;

/// Storage operations needed by the leaderboard workflow.
///
/// Each method is a single atomic step on the backend. Multi-step flows
/// (check, claim, increment) are composed by the caller.
#[async_trait]
pub trait LeaderboardStore: Send + Sync {
    /// Round-trip to the backend.
    async fn ping(&self) -> StoreResult<()>;

    /// Increment the counter at `key` and (re)arm its expiry in one atomic
    /// step. Returns the post-increment count.
    async fn hit_counter(&self, key: &str, ttl: Duration) -> StoreResult<u64>;

    /// Store a new session record that expires after `ttl`.
    async fn put_session(&self, record: &SessionRecord, ttl: Duration) -> StoreResult<()>;

    /// Load a session record. `Ok(None)` when missing or expired in the store.
    async fn get_session(&self, token: &SessionToken) -> StoreResult<Option<SessionRecord>>;

    async fn delete_session(&self, token: &SessionToken) -> StoreResult<()>;

    /// Atomically mark a session used. Returns `false` if it was already used
    /// (or no longer exists). On success the record is retained for `retain`.
    async fn claim_session(&self, token: &SessionToken, retain: Duration) -> StoreResult<bool>;

    /// Atomically add `delta` to `name`'s cumulative score, returning the new total.
    async fn increment_score(&self, name: &str, delta: Score) -> StoreResult<TotalScore>;

    /// Record `at` as `name`'s last update, expiring after `ttl`.
    async fn touch_player(&self, name: &str, at: Timestamp, ttl: Duration) -> StoreResult<()>;

    /// Up to `limit` `(name, total)` pairs, highest total first.
    async fn top_scores(&self, limit: usize) -> StoreResult<Vec<(String, TotalScore)>>;

    /// Last-update timestamps for `names`, in the same order.
    async fn player_timestamps(&self, names: &[String]) -> StoreResult<Vec<Option<Timestamp>>>;
}
