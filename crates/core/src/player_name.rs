//! Display-name sanitizing and denylist checks for leaderboard entries.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Maximum display name length, in characters.
pub const MAX_NAME_CHARS: usize = 20;

/// Substrings that reject a name outright (matched case-insensitively).
///
/// Matching is plain substring containment, so e.g. "Abbot" is rejected for
/// containing "bot".
pub const DENYLIST: &[&str] = &[
    "admin",
    "bot",
    "fuck",
    "http",
    "moderator",
    "null",
    "root",
    "script",
    "shit",
    "system",
    "test",
    "undefined",
    "www",
];

static DISALLOWED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s-]").expect("valid regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Normalize a raw display name.
///
/// Steps: trim, keep the first [`MAX_NAME_CHARS`] characters, drop anything
/// outside `[A-Za-z0-9_\s-]`, collapse whitespace runs to a single space,
/// trim again. The result is a fixed point: `sanitize(sanitize(x)) == sanitize(x)`.
pub fn sanitize(raw: &str) -> String {
    let capped: String = raw.trim().chars().take(MAX_NAME_CHARS).collect();
    let stripped = DISALLOWED_RE.replace_all(&capped, "");
    let collapsed = WHITESPACE_RE.replace_all(&stripped, " ");
    collapsed.trim().to_string()
}

/// Return the first denylisted substring found in `name`, if any.
pub fn denylisted_term(name: &str) -> Option<&'static str> {
    let lower = name.to_lowercase();
    DENYLIST.iter().copied().find(|term| lower.contains(term))
}

/// Sanitize `raw` and reject empty or denylisted results.
pub fn validate(raw: &str) -> Result<String, CoreError> {
    let name = sanitize(raw);
    if name.is_empty() {
        return Err(CoreError::InvalidName(
            "name must contain letters, digits, spaces, '_' or '-'".into(),
        ));
    }
    if denylisted_term(&name).is_some() {
        return Err(CoreError::InvalidName("name is not allowed".into()));
    }
    Ok(name)
}
