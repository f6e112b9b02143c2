//! Time-related utilities.

use chrono::{DateTime, Local, TimeDelta, Utc};

/// Current Unix timestamp (milliseconds, UTC)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Milliseconds elapsed between `since_millis` and `until_millis`, clamped at zero
pub fn elapsed_millis(since_millis: i64, until_millis: i64) -> i64 {
    (until_millis - since_millis).max(0)
}

/// Render a duration in milliseconds as a short human readable string (e.g. "1h 2m 3s")
pub fn format_duration(millis: i64) -> String {
    let delta = TimeDelta::milliseconds(millis.max(0));
    let hours = delta.num_hours();
    let minutes = delta.num_minutes() % 60;
    let seconds = delta.num_seconds() % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else if seconds > 0 {
        format!("{}s", seconds)
    } else {
        format!("{}ms", delta.num_milliseconds())
    }
}

/// Convert a Unix timestamp (milliseconds) to RFC 3339 in the local time zone
///
/// Returns `None` when the timestamp is out of chrono's representable range.
pub fn timestamp_to_local_rfc3339(timestamp_millis: i64) -> Option<String> {
    let utc = DateTime::<Utc>::from_timestamp_millis(timestamp_millis)?;
    Some(utc.with_timezone(&Local).to_rfc3339())
}
