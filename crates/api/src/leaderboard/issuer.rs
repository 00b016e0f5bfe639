use std::time::Duration;

use serde::Serialize;
use vibe_core::rate_limit::RateLimitPurpose;
use vibe_core::session::{
    GameMetadata, SessionRecord, SESSION_RECORD_TTL_SECS, SESSION_TIMEOUT_SECS,
};

use super::LeaderboardService;
use crate::error::AppResult;

/// Raw session request as received from the client.
#[derive(Debug, Clone, Default)]
pub struct SessionRequest {
    pub game_type: String,
    pub original_prompt: String,
    pub user_prompt: String,
}

/// A freshly issued game session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedSession {
    pub session_token: String,
    /// Session lifetime in milliseconds.
    pub expires_in: u64,
}

impl LeaderboardService {
    /// Issue a single-use session for one game attempt from `ip`.
    ///
    /// Rate limited per IP before any validation. The session is valid for
    /// [`SESSION_TIMEOUT_SECS`]; the record itself is kept for
    /// [`SESSION_RECORD_TTL_SECS`] so late submissions can be told apart
    /// from unknown tokens.
    pub async fn issue_session(
        &self,
        request: SessionRequest,
        ip: &str,
    ) -> AppResult<IssuedSession> {
        self.limiter
            .check(RateLimitPurpose::SessionIssue, ip)
            .await?;

        let game = GameMetadata::new(
            &request.game_type,
            &request.original_prompt,
            &request.user_prompt,
        )?;

        let record = SessionRecord::issue(game, ip, self.clock.now());
        let ttl = Duration::from_secs(SESSION_RECORD_TTL_SECS as u64);
        self.store.put_session(&record, ttl).await?;

        tracing::info!(
            ip,
            game_type = %record.game.game_type,
            "Game session issued"
        );

        Ok(IssuedSession {
            session_token: record.token.to_string(),
            expires_in: SESSION_TIMEOUT_SECS as u64 * 1000,
        })
    }
}
