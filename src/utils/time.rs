//! Time and timestamp utilities

use chrono::{DateTime, SecondsFormat, Utc};

/// Current instant as ISO-8601 with millisecond precision, e.g.
/// `2026-01-01T12:00:00.000Z`
pub fn now_iso8601() -> String {
    format_iso8601(Utc::now())
}

/// Format an instant the way block timestamps are stored
pub fn format_iso8601(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}
