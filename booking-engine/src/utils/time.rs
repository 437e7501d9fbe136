//! 倒计时显示

use std::time::Duration;

/// Whole seconds left, rounded up so the display never shows 0:00 early
pub fn ceil_secs(remaining: Duration) -> u64 {
    remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)
}

/// `m:ss` countdown display (`300` -> `5:00`, `9` -> `0:09`)
pub fn format_countdown(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Whole minutes for message text (`300` -> `5`, rounds up)
pub fn minutes_label(secs: i64) -> i64 {
    (secs.max(0) + 59) / 60
}
