//! Game sessions: single-use tokens that bind one leaderboard submission to
//! one issued game attempt.

use std::fmt;
use std::fmt::Write as _;

use chrono::Duration;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Random bytes per token (256 bits).
pub const TOKEN_BYTES: usize = 32;

/// Rendered token length: two lowercase hex characters per byte.
pub const TOKEN_LENGTH: usize = TOKEN_BYTES * 2;

/// How long an issued session stays valid for submission.
pub const SESSION_TIMEOUT_SECS: i64 = 30 * 60;

/// How long an unused session record outlives its validity window, so a
/// late submission reports `SessionExpired` instead of `SessionNotFound`.
pub const EXPIRED_SESSION_GRACE_SECS: i64 = 60 * 60;

/// Store TTL for a freshly issued session record.
pub const SESSION_RECORD_TTL_SECS: i64 = SESSION_TIMEOUT_SECS + EXPIRED_SESSION_GRACE_SECS;

/// How long a consumed session is retained so replays report
/// `SessionAlreadyUsed` instead of `SessionNotFound`.
pub const USED_SESSION_RETENTION_SECS: i64 = 60 * 60;

/// Maximum stored length of the original prompt, in characters.
pub const MAX_ORIGINAL_PROMPT_CHARS: usize = 500;

/// Maximum stored length of the user prompt, in characters.
pub const MAX_USER_PROMPT_CHARS: usize = 1000;

/// Maximum accepted length of the game type label, in characters.
pub const MAX_GAME_TYPE_CHARS: usize = 64;

/// Session lifetime as a [`Duration`].
pub fn session_timeout() -> Duration {
    Duration::seconds(SESSION_TIMEOUT_SECS)
}

// ---------------------------------------------------------------------------
// SessionToken
// ---------------------------------------------------------------------------

/// A 64-character lowercase hex session token.
///
/// The only ways to obtain one are [`SessionToken::generate`] and
/// [`SessionToken::parse`], so holding a value means the shape is valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generate a fresh token from 256 bits of CSPRNG output.
    pub fn generate() -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill(&mut bytes);

        let mut hex = String::with_capacity(TOKEN_LENGTH);
        for byte in bytes {
            // Writing to a String cannot fail.
            let _ = write!(hex, "{byte:02x}");
        }
        Self(hex)
    }

    /// Accept a client-supplied token only if it is exactly 64 lowercase
    /// hex characters.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let well_formed = raw.len() == TOKEN_LENGTH
            && raw
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if well_formed {
            Ok(Self(raw.to_string()))
        } else {
            Err(CoreError::InvalidToken)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Game metadata
// ---------------------------------------------------------------------------

/// What the client was playing when the session was issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMetadata {
    pub game_type: String,
    pub original_prompt: String,
    pub user_prompt: String,
}

impl GameMetadata {
    /// Build metadata from raw client input.
    ///
    /// The game type is trimmed and must be non-empty and at most
    /// [`MAX_GAME_TYPE_CHARS`]. Prompts are truncated, never rejected.
    pub fn new(
        game_type: &str,
        original_prompt: &str,
        user_prompt: &str,
    ) -> Result<Self, CoreError> {
        let game_type = game_type.trim();
        if game_type.is_empty() {
            return Err(CoreError::Validation("gameType is required".into()));
        }
        if game_type.chars().count() > MAX_GAME_TYPE_CHARS {
            return Err(CoreError::Validation(format!(
                "gameType must be at most {MAX_GAME_TYPE_CHARS} characters"
            )));
        }

        Ok(Self {
            game_type: game_type.to_string(),
            original_prompt: truncate_chars(original_prompt, MAX_ORIGINAL_PROMPT_CHARS),
            user_prompt: truncate_chars(user_prompt, MAX_USER_PROMPT_CHARS),
        })
    }
}

/// Keep at most `max` Unicode scalar values of `s`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((byte_idx, _)) => s[..byte_idx].to_string(),
        None => s.to_string(),
    }
}

// ---------------------------------------------------------------------------
// SessionRecord
// ---------------------------------------------------------------------------

/// A stored game session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub token: SessionToken,
    pub game: GameMetadata,
    pub created_at: Timestamp,
    pub ip: String,
    pub used: bool,
}

impl SessionRecord {
    /// A fresh, unused session owned by `ip`.
    pub fn issue(game: GameMetadata, ip: impl Into<String>, now: Timestamp) -> Self {
        Self {
            token: SessionToken::generate(),
            game,
            created_at: now,
            ip: ip.into(),
            used: false,
        }
    }

    /// True once strictly more than [`SESSION_TIMEOUT_SECS`] have elapsed.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now - self.created_at > session_timeout()
    }
}
