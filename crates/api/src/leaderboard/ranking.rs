use vibe_core::leaderboard::{LeaderboardEntry, TOP_ENTRIES};

use super::LeaderboardService;
use crate::error::AppResult;

impl LeaderboardService {
    /// The top [`TOP_ENTRIES`] names by cumulative score.
    ///
    /// Store failures are logged and reported as an empty board.
    pub async fn top_entries(&self) -> Vec<LeaderboardEntry> {
        match self.load_top_entries().await {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(error = %err, "Leaderboard read failed, returning empty board");
                Vec::new()
            }
        }
    }

    async fn load_top_entries(&self) -> AppResult<Vec<LeaderboardEntry>> {
        let rows = self.store.top_scores(TOP_ENTRIES).await?;
        let names: Vec<String> = rows.iter().map(|(name, _)| name.clone()).collect();
        let stamps = self.store.player_timestamps(&names).await?;

        let now = self.clock.now();
        Ok(rows
            .into_iter()
            .zip(stamps)
            .map(|((name, score), stamp)| LeaderboardEntry {
                name,
                score,
                timestamp: stamp.unwrap_or(now).timestamp_millis(),
            })
            .collect())
    }
}
