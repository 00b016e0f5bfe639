//! Key layout shared by all backends.

use vibe_core::session::SessionToken;

/// Sorted set of cumulative scores, member = display name.
pub const LEADERBOARD_KEY: &str = "leaderboard";

// Session hash fields.
pub const FIELD_GAME_TYPE: &str = "gameType";
pub const FIELD_ORIGINAL_PROMPT: &str = "originalPrompt";
pub const FIELD_USER_PROMPT: &str = "userPrompt";
pub const FIELD_TIMESTAMP: &str = "timestamp";
pub const FIELD_IP: &str = "ip";
pub const FIELD_USED: &str = "used";

/// Hash holding one session record.
pub fn session(token: &SessionToken) -> String {
    format!("session:{token}")
}

/// Last-update timestamp (ms since epoch) for a display name.
pub fn player_timestamp(name: &str) -> String {
    format!("{LEADERBOARD_KEY}:timestamp:{name}")
}
