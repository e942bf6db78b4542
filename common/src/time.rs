//! Wall-clock source for the production tick driver.
//!
//! Core components never read the clock themselves: every engine entry
//! point takes an explicit `now_ms` so tests can drive time directly.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current Unix time in milliseconds.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
