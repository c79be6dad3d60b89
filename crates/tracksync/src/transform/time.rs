//! Lossy timestamp normalization.
//!
//! The tracker emits timestamps in two shapes: a 12-hour clock form
//! (`"2025-12-18 12:52:23 AM"`) in live feeds and ISO-8601 with `Z` or an
//! explicit offset elsewhere. Anything else is passed through unchanged:
//! an unparsable timestamp must not cause the record to be dropped.

use chrono::{DateTime, NaiveDateTime, SecondsFormat};

/// Normalize a timestamp string to ISO-8601, passing unparsable input
/// through unchanged.
#[must_use]
pub fn normalize_timestamp(raw: &str) -> String {
    // Live-feed form: 12-hour clock with AM/PM.
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %I:%M:%S %p") {
        return dt.format("%Y-%m-%dT%H:%M:%S").to_string();
    }

    // ISO-8601 with Z or explicit offset.
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.to_rfc3339_opts(SecondsFormat::Secs, false);
    }

    // Bare ISO-8601 without offset; already normalized, reformat for
    // consistency (drops fractional seconds).
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%dT%H:%M:%S").to_string();
    }

    raw.to_string()
}
