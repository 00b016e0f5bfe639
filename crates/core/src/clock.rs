//! Source of "now" for session expiry and rate-limit windows.

use chrono::Utc;

use crate::types::Timestamp;

/// Wall-clock source. Swapped out in tests that drive time by hand.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// The system UTC clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}
