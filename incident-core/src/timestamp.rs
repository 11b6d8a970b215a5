//! Lenient handling of the timestamp strings the backend emits.
//!
//! The API sometimes writes `2024-03-01 08:00:00` and sometimes RFC 3339
//! with a `T`. Everything here accepts both, and anything unparseable
//! collapses to the epoch instead of propagating an error into a sort or
//! a render path.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a backend timestamp, tolerating a space in place of the `T`.
pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    let normalized = raw.trim().replacen(' ', "T", 1);
    if normalized.is_empty() {
        return None;
    }
    if let Ok(fixed) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(fixed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    None
}

/// Milliseconds since the epoch, with malformed input pinned to zero so
/// broken records sort together at the old end of a feed.
pub fn parse_millis(raw: &str) -> i64 {
    parse(raw).map(|ts| ts.timestamp_millis()).unwrap_or(0)
}

/// Short row label, e.g. `Mar 1, 08:00`. Unparseable input is shown as-is.
pub fn compact_label(raw: &str) -> String {
    match parse(raw) {
        Some(ts) => ts.format("%b %-d, %H:%M").to_string(),
        None => raw.to_string(),
    }
}

/// Date-only label, e.g. `Mar 1, 2024`.
pub fn date_label(raw: &str) -> String {
    match parse(raw) {
        Some(ts) => ts.format("%b %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}
