//! Date/time utilities.

use chrono::{DateTime, Local, TimeZone};

/// Format used to prefix stored upload names (whole-second granularity).
pub const UPLOAD_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Format a timestamp as `YYYYMMDD_HHMMSS`.
///
/// Two calls within the same second return the same string.
pub fn format_upload_timestamp<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    dt.format(UPLOAD_TIMESTAMP_FORMAT).to_string()
}

/// Format used for human-readable timestamps in JSON responses.
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a timestamp as `YYYY-MM-DD HH:MM:SS`.
pub fn format_display_timestamp<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    dt.format(DISPLAY_TIMESTAMP_FORMAT).to_string()
}

/// Current local time.
pub fn now() -> DateTime<Local> {
    Local::now()
}
