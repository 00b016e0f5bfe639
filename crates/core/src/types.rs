use chrono::{DateTime, Utc};

/// UTC timestamp used for session creation and leaderboard updates.
pub type Timestamp = DateTime<Utc>;

/// A single validated score submission (0..=1000).
pub type Score = u32;

/// Cumulative score for one display name.
pub type TotalScore = u64;
