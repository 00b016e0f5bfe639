use std::time::Duration;

use vibe_core::error::CoreError;
use vibe_core::leaderboard::{ScoreUpdate, PLAYER_TIMESTAMP_RETENTION_SECS};
use vibe_core::rate_limit::RateLimitPurpose;
use vibe_core::session::{SessionToken, USED_SESSION_RETENTION_SECS};
use vibe_core::{player_name, score};

use super::LeaderboardService;
use crate::error::{AppError, AppResult};

/// Raw score submission as received from the client.
#[derive(Debug, Clone)]
pub struct Submission {
    pub name: String,
    pub score: serde_json::Value,
    pub session_token: String,
    /// Opaque client data about the finished game. Logged, never stored.
    pub game_data: Option<serde_json::Value>,
}

impl LeaderboardService {
    /// Validate a submission against its session and add the score to the
    /// name's cumulative total.
    ///
    /// Checks run in a fixed order (rate limit, token shape, session lookup,
    /// expiry, name, score, reuse) so clients see the first failing rule.
    /// The session is claimed atomically before the score is added, so a
    /// token can never count twice.
    pub async fn submit_score(&self, submission: Submission, ip: &str) -> AppResult<ScoreUpdate> {
        // 1. Rate limit.
        self.limiter.check(RateLimitPurpose::ScoreSubmit, ip).await?;

        // 2. Token shape.
        let token = SessionToken::parse(&submission.session_token)?;

        // 3. Session lookup.
        let session = self
            .store
            .get_session(&token)
            .await?
            .ok_or(AppError::Core(CoreError::SessionNotFound))?;

        // 4. Expiry. The record outlives its validity window by a grace period.
        let now = self.clock.now();
        if session.is_expired(now) {
            self.store.delete_session(&token).await?;
            return Err(CoreError::SessionExpired.into());
        }

        // 5. Name.
        let name = player_name::validate(&submission.name).inspect_err(|_| {
            tracing::info!(ip, raw_name = %submission.name, "Rejected leaderboard name");
        })?;

        // 6. Score.
        let added = score::validate(&submission.score)?;

        // 7. Reuse.
        if session.used {
            return Err(CoreError::SessionAlreadyUsed.into());
        }
        let retain = Duration::from_secs(USED_SESSION_RETENTION_SECS as u64);
        if !self.store.claim_session(&token, retain).await? {
            // Lost a race with a concurrent submission of the same token.
            return Err(CoreError::SessionAlreadyUsed.into());
        }

        // 8. Aggregate.
        let new_total = self.store.increment_score(&name, added).await?;
        self.store
            .touch_player(
                &name,
                now,
                Duration::from_secs(PLAYER_TIMESTAMP_RETENTION_SECS as u64),
            )
            .await?;

        let update = ScoreUpdate::from_new_total(new_total, added);

        tracing::info!(
            ip,
            name = %name,
            game_type = %session.game.game_type,
            added = update.added_score,
            total = update.new_score,
            "Score submitted"
        );
        if let Some(game_data) = &submission.game_data {
            tracing::debug!(name = %name, %game_data, "Submission game data");
        }

        Ok(update)
    }
}
