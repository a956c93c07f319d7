//! # Time Utilities

use chrono::{DateTime, SecondsFormat, Utc};

/// Format time as an RFC3339 string with millisecond precision (`2024-01-01T00:00:00.000Z`).
pub fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}
