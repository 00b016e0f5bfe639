//! Leaderboard read/write shapes and retention constants.

use serde::Serialize;

use crate::types::{Score, TotalScore};

/// Maximum entries returned by a leaderboard read.
pub const TOP_ENTRIES: usize = 100;

/// How long a name's last-update timestamp is retained after its latest
/// submission.
pub const PLAYER_TIMESTAMP_RETENTION_SECS: i64 = 30 * 24 * 60 * 60;

/// One row of the public leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: TotalScore,
    /// Last update, in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Outcome of a successful score submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreUpdate {
    pub new_score: TotalScore,
    pub added_score: Score,
    pub previous_score: TotalScore,
}

impl ScoreUpdate {
    /// Derive the update from the post-increment total.
    pub fn from_new_total(new_score: TotalScore, added_score: Score) -> Self {
        Self {
            new_score,
            added_score,
            previous_score: new_score.saturating_sub(TotalScore::from(added_score)),
        }
    }
}
