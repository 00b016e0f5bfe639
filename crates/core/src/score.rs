//! Score bounds for a single submission.

use serde_json::Value;

use crate::error::CoreError;
use crate::types::Score;

/// Highest score a single game can award.
pub const MAX_SCORE: Score = 1000;

/// Validate a raw JSON score.
///
/// Accepts only finite, non-negative integral numbers no greater than
/// [`MAX_SCORE`]. `10` and `10.0` are both accepted; `10.5`, `-1`, `"10"`
/// and `null` are not.
pub fn validate(raw: &Value) -> Result<Score, CoreError> {
    let Some(number) = raw.as_f64() else {
        return Err(CoreError::InvalidScore("score must be a number".into()));
    };

    if !number.is_finite() || number.fract() != 0.0 {
        return Err(CoreError::InvalidScore("score must be an integer".into()));
    }
    if !(0.0..=f64::from(MAX_SCORE)).contains(&number) {
        return Err(CoreError::InvalidScore(format!(
            "score must be between 0 and {MAX_SCORE}"
        )));
    }

    // In range and integral, so the cast is exact.
    Ok(number as Score)
}
