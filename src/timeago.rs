//! Human-readable age strings for post listings ("3 hours ago").

use chrono::{DateTime, Utc};

/// Render how long ago an RFC 3339 timestamp was, relative to now.
/// Unparseable timestamps degrade to "just now" rather than failing a
/// whole listing.
#[must_use]
pub fn since(created_at: &str) -> String {
    DateTime::parse_from_rfc3339(created_at).map_or_else(
        |_| "just now".to_string(),
        |then| render(Utc::now().signed_duration_since(then.with_timezone(&Utc)).num_seconds()),
    )
}

fn render(seconds: i64) -> String {
    if seconds < 60 {
        return "just now".to_string();
    }

    let (value, unit) = if seconds < 3600 {
        (seconds / 60, "minute")
    } else if seconds < 86_400 {
        (seconds / 3600, "hour")
    } else if seconds < 2_592_000 {
        (seconds / 86_400, "day")
    } else if seconds < 31_536_000 {
        (seconds / 2_592_000, "month")
    } else {
        (seconds / 31_536_000, "year")
    };

    if value == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{value} {unit}s ago")
    }
}
