//! Redis backend.
//!
//! Sessions are hashes with a TTL, scores live in one sorted set, and every
//! multi-command step runs as a `MULTI` pipeline or a Lua script so it is
//! atomic on the server.

use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use vibe_core::session::{GameMetadata, SessionRecord, SessionToken};
use vibe_core::types::{Score, Timestamp, TotalScore};

use crate::error::{StoreError, StoreResult};
use crate::keys;
use crate::LeaderboardStore;

/// Set `used` only if the session still exists and is not used yet, then
/// re-arm its expiry. Returns 1 when this call claimed the session.
static CLAIM_SCRIPT: LazyLock<redis::Script> = LazyLock::new(|| {
    redis::Script::new(
        r"
        if redis.call('EXISTS', KEYS[1]) == 0 then
            return 0
        end
        if redis.call('HSETNX', KEYS[1], ARGV[1], 'true') == 0 then
            return 0
        end
        redis.call('EXPIRE', KEYS[1], ARGV[2])
        return 1
        ",
    )
});

/// Redis-backed [`LeaderboardStore`].
///
/// Holds a [`ConnectionManager`], which reconnects on its own and is cheap
/// to clone per command.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Open a client for `url` and establish the managed connection.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let client = redis::Client::open(url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self { conn })
    }

    fn conn(&self) -> ConnectionManager {
        self.conn.clone()
    }
}

/// Redis TTLs are whole seconds; never send zero (that deletes the key).
fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

fn corrupt(key: &str, reason: impl Into<String>) -> StoreError {
    StoreError::Corrupt {
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn millis_to_timestamp(key: &str, millis: i64) -> StoreResult<Timestamp> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| corrupt(key, format!("timestamp {millis} out of range")))
}

/// Rebuild a [`SessionRecord`] from its hash fields.
fn decode_session(
    key: &str,
    token: &SessionToken,
    mut fields: HashMap<String, String>,
) -> StoreResult<SessionRecord> {
    let mut take = |name: &str| fields.remove(name).unwrap_or_default();

    let game = GameMetadata {
        game_type: take(keys::FIELD_GAME_TYPE),
        original_prompt: take(keys::FIELD_ORIGINAL_PROMPT),
        user_prompt: take(keys::FIELD_USER_PROMPT),
    };
    let ip = take(keys::FIELD_IP);
    let used = take(keys::FIELD_USED) == "true";

    let raw_ts = take(keys::FIELD_TIMESTAMP);
    let millis: i64 = raw_ts
        .parse()
        .map_err(|_| corrupt(key, format!("bad timestamp {raw_ts:?}")))?;

    Ok(SessionRecord {
        token: token.clone(),
        game,
        created_at: millis_to_timestamp(key, millis)?,
        ip,
        used,
    })
}

#[async_trait]
impl LeaderboardStore for RedisStore {
    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.conn();
        let _pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn hit_counter(&self, key: &str, ttl: Duration) -> StoreResult<u64> {
        let mut conn = self.conn();
        let (count,): (u64,) = redis::pipe()
            .atomic()
            .incr(key, 1u64)
            .expire(key, ttl_secs(ttl) as i64)
            .ignore()
            .query_async(&mut conn)
            .await?;
        Ok(count)
    }

    async fn put_session(&self, record: &SessionRecord, ttl: Duration) -> StoreResult<()> {
        let key = keys::session(&record.token);
        // `used` is written only by `claim_session`, so HSETNX can claim it.
        let fields = [
            (keys::FIELD_GAME_TYPE, record.game.game_type.clone()),
            (keys::FIELD_ORIGINAL_PROMPT, record.game.original_prompt.clone()),
            (keys::FIELD_USER_PROMPT, record.game.user_prompt.clone()),
            (keys::FIELD_TIMESTAMP, record.created_at.timestamp_millis().to_string()),
            (keys::FIELD_IP, record.ip.clone()),
        ];

        let mut conn = self.conn();
        let () = redis::pipe()
            .atomic()
            .hset_multiple(&key, &fields[..])
            .ignore()
            .expire(&key, ttl_secs(ttl) as i64)
            .ignore()
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn get_session(&self, token: &SessionToken) -> StoreResult<Option<SessionRecord>> {
        let key = keys::session(token);
        let mut conn = self.conn();
        let fields: HashMap<String, String> = conn.hgetall(&key).await?;
        if fields.is_empty() {
            return Ok(None);
        }
        decode_session(&key, token, fields).map(Some)
    }

    async fn delete_session(&self, token: &SessionToken) -> StoreResult<()> {
        let mut conn = self.conn();
        let _removed: u64 = conn.del(keys::session(token)).await?;
        Ok(())
    }

    async fn claim_session(&self, token: &SessionToken, retain: Duration) -> StoreResult<bool> {
        let mut conn = self.conn();
        let claimed: i64 = CLAIM_SCRIPT
            .key(keys::session(token))
            .arg(keys::FIELD_USED)
            .arg(ttl_secs(retain))
            .invoke_async(&mut conn)
            .await?;
        Ok(claimed == 1)
    }

    async fn increment_score(&self, name: &str, delta: Score) -> StoreResult<TotalScore> {
        let mut conn = self.conn();
        let total: f64 = conn.zincr(keys::LEADERBOARD_KEY, name, delta).await?;
        Ok(total.max(0.0).round() as TotalScore)
    }

    async fn touch_player(&self, name: &str, at: Timestamp, ttl: Duration) -> StoreResult<()> {
        let mut conn = self.conn();
        let () = conn
            .set_ex(keys::player_timestamp(name), at.timestamp_millis(), ttl_secs(ttl))
            .await?;
        Ok(())
    }

    async fn top_scores(&self, limit: usize) -> StoreResult<Vec<(String, TotalScore)>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let mut conn = self.conn();
        let rows: Vec<(String, f64)> = conn
            .zrevrange_withscores(keys::LEADERBOARD_KEY, 0, limit as isize - 1)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(name, score)| (name, score.max(0.0).round() as TotalScore))
            .collect())
    }

    async fn player_timestamps(&self, names: &[String]) -> StoreResult<Vec<Option<Timestamp>>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let ts_keys: Vec<String> = names.iter().map(|n| keys::player_timestamp(n)).collect();

        let mut conn = self.conn();
        let raw: Vec<Option<String>> = conn.mget(&ts_keys).await?;

        // Unparseable values are treated as missing rather than failing the read.
        Ok(raw
            .into_iter()
            .zip(&ts_keys)
            .map(|(value, key)| {
                let value = value?;
                let parsed = value
                    .parse::<i64>()
                    .ok()
                    .and_then(DateTime::from_timestamp_millis);
                if parsed.is_none() {
                    tracing::warn!(key = %key, value = %value, "Ignoring unparseable player timestamp");
                }
                parsed
            })
            .collect())
    }
}
