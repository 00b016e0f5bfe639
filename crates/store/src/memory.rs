//! In-process backend for tests and local development.
//!
//! Mirrors the Redis key semantics: per-key TTLs against
//! [`tokio::time::Instant`] (so paused-clock tests work) and one lock around
//! every operation, which gives the same per-call atomicity the Redis
//! commands and scripts provide. Expired keys are evicted when read, and
//! writes sweep all maps at most once per `SWEEP_INTERVAL`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use vibe_core::session::{SessionRecord, SessionToken};
use vibe_core::types::{Score, Timestamp, TotalScore};

use crate::error::StoreResult;
use crate::LeaderboardStore;

/// Minimum time between full sweeps of expired keys.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

struct Expiring<T> {
    value: T,
    expires_at: Instant,
}

impl<T> Expiring<T> {
    fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }
}

/// Look up `key`, evicting it first if its TTL has passed.
fn live<'a, T>(map: &'a mut HashMap<String, Expiring<T>>, key: &str) -> Option<&'a mut Expiring<T>> {
    if map.get(key).is_some_and(|e| e.expires_at <= Instant::now()) {
        map.remove(key);
    }
    map.get_mut(key)
}

fn evict_expired<T>(map: &mut HashMap<String, Expiring<T>>, now: Instant) {
    map.retain(|_, e| e.expires_at > now);
}

#[derive(Default)]
struct Inner {
    counters: HashMap<String, Expiring<u64>>,
    sessions: HashMap<String, Expiring<SessionRecord>>,
    scores: HashMap<String, TotalScore>,
    timestamps: HashMap<String, Expiring<Timestamp>>,
    last_sweep: Option<Instant>,
}

impl Inner {
    /// Drop every expired key, unless a sweep ran within `SWEEP_INTERVAL`.
    ///
    /// Rate-limit keys embed the window index and are never read again once
    /// the window passes, so lazy eviction alone would keep them forever.
    fn sweep(&mut self) {
        let now = Instant::now();
        if self
            .last_sweep
            .is_some_and(|at| now.duration_since(at) < SWEEP_INTERVAL)
        {
            return;
        }
        evict_expired(&mut self.counters, now);
        evict_expired(&mut self.sessions, now);
        evict_expired(&mut self.timestamps, now);
        self.last_sweep = Some(now);
    }
}

/// [`LeaderboardStore`] held entirely in memory. Data is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeaderboardStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn hit_counter(&self, key: &str, ttl: Duration) -> StoreResult<u64> {
        let mut inner = self.inner.lock().await;
        inner.sweep();
        let count = match live(&mut inner.counters, key) {
            Some(entry) => {
                entry.value += 1;
                entry.expires_at = Instant::now() + ttl;
                entry.value
            }
            None => {
                inner.counters.insert(key.to_string(), Expiring::new(1, ttl));
                1
            }
        };
        Ok(count)
    }

    async fn put_session(&self, record: &SessionRecord, ttl: Duration) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        inner.sweep();
        inner.sessions.insert(
            record.token.as_str().to_string(),
            Expiring::new(record.clone(), ttl),
        );
        Ok(())
    }

    async fn get_session(&self, token: &SessionToken) -> StoreResult<Option<SessionRecord>> {
        let mut inner = self.inner.lock().await;
        Ok(live(&mut inner.sessions, token.as_str()).map(|e| e.value.clone()))
    }

    async fn delete_session(&self, token: &SessionToken) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        inner.sessions.remove(token.as_str());
        Ok(())
    }

    async fn claim_session(&self, token: &SessionToken, retain: Duration) -> StoreResult<bool> {
        let mut inner = self.inner.lock().await;
        let Some(entry) = live(&mut inner.sessions, token.as_str()) else {
            return Ok(false);
        };
        if entry.value.used {
            return Ok(false);
        }
        entry.value.used = true;
        entry.expires_at = Instant::now() + retain;
        Ok(true)
    }

    async fn increment_score(&self, name: &str, delta: Score) -> StoreResult<TotalScore> {
        let mut inner = self.inner.lock().await;
        let total = inner.scores.entry(name.to_string()).or_insert(0);
        *total += TotalScore::from(delta);
        Ok(*total)
    }

    async fn touch_player(&self, name: &str, at: Timestamp, ttl: Duration) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        inner.sweep();
        inner
            .timestamps
            .insert(name.to_string(), Expiring::new(at, ttl));
        Ok(())
    }

    async fn top_scores(&self, limit: usize) -> StoreResult<Vec<(String, TotalScore)>> {
        let inner = self.inner.lock().await;
        let mut rows: Vec<(String, TotalScore)> = inner
            .scores
            .iter()
            .map(|(name, score)| (name.clone(), *score))
            .collect();
        // Same order as ZREVRANGE: score descending, ties by member descending.
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn player_timestamps(&self, names: &[String]) -> StoreResult<Vec<Option<Timestamp>>> {
        let mut inner = self.inner.lock().await;
        Ok(names
            .iter()
            .map(|name| live(&mut inner.timestamps, name).map(|e| e.value))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use vibe_core::session::GameMetadata;

    use super::*;

    fn session() -> SessionRecord {
        let game = GameMetadata::new("golf", "", "").unwrap();
        SessionRecord::issue(game, "127.0.0.1", Utc::now())
    }

    #[tokio::test(start_paused = true)]
    async fn counter_resets_after_ttl() {
        let store = MemoryStore::new();
        let ttl = Duration::from_secs(60);

        assert_eq!(store.hit_counter("k", ttl).await.unwrap(), 1);
        assert_eq!(store.hit_counter("k", ttl).await.unwrap(), 2);

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(store.hit_counter("k", ttl).await.unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn counters_from_past_windows_are_swept() {
        let store = MemoryStore::new();
        let ttl = Duration::from_secs(60);

        for window in 0..200 {
            let key = format!("rate_limit:session:10.0.0.1:{window}");
            store.hit_counter(&key, ttl).await.unwrap();
            tokio::time::advance(Duration::from_secs(61)).await;
        }

        assert_eq!(store.inner.lock().await.counters.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unsubmitted_sessions_are_swept_on_later_writes() {
        let store = MemoryStore::new();
        for _ in 0..10 {
            store
                .put_session(&session(), Duration::from_secs(1800))
                .await
                .unwrap();
        }

        tokio::time::advance(Duration::from_secs(1801)).await;
        store
            .put_session(&session(), Duration::from_secs(1800))
            .await
            .unwrap();

        assert_eq!(store.inner.lock().await.sessions.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn session_expires_with_ttl() {
        let store = MemoryStore::new();
        let record = session();
        store
            .put_session(&record, Duration::from_secs(1800))
            .await
            .unwrap();

        assert!(store.get_session(&record.token).await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(1801)).await;
        assert!(store.get_session(&record.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn claim_succeeds_once() {
        let store = MemoryStore::new();
        let record = session();
        let retain = Duration::from_secs(3600);
        store
            .put_session(&record, Duration::from_secs(1800))
            .await
            .unwrap();

        assert!(store.claim_session(&record.token, retain).await.unwrap());
        assert!(!store.claim_session(&record.token, retain).await.unwrap());
        assert!(store.get_session(&record.token).await.unwrap().unwrap().used);
    }

    #[tokio::test]
    async fn claim_of_missing_session_fails() {
        let store = MemoryStore::new();
        let token = SessionToken::generate();
        assert!(!store
            .claim_session(&token, Duration::from_secs(60))
            .await
            .unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn claimed_session_is_retained_for_the_new_ttl() {
        let store = MemoryStore::new();
        let record = session();
        store
            .put_session(&record, Duration::from_secs(1800))
            .await
            .unwrap();
        store
            .claim_session(&record.token, Duration::from_secs(3600))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(2000)).await;
        assert!(store.get_session(&record.token).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn scores_accumulate_and_rank() {
        let store = MemoryStore::new();
        store.increment_score("alice", 10).await.unwrap();
        store.increment_score("bob", 50).await.unwrap();
        assert_eq!(store.increment_score("alice", 45).await.unwrap(), 55);

        let top = store.top_scores(10).await.unwrap();
        assert_eq!(top, vec![("alice".to_string(), 55), ("bob".to_string(), 50)]);
        assert_eq!(store.top_scores(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn timestamps_follow_name_order() {
        let store = MemoryStore::new();
        let at = Utc::now();
        store
            .touch_player("bob", at, Duration::from_secs(60))
            .await
            .unwrap();

        let names = vec!["alice".to_string(), "bob".to_string()];
        let stamps = store.player_timestamps(&names).await.unwrap();
        assert_eq!(stamps, vec![None, Some(at)]);
    }
}
