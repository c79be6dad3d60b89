//! Field extraction helpers over raw upstream rows.
//!
//! The upstream emits synonymous keys for the same logical field depending on
//! endpoint and report version, so every destination field is described by an
//! ordered candidate list evaluated first-match-wins.

use serde_json::Value;

use super::time::normalize_timestamp;

/// Return the first candidate key present with a non-null value.
pub(crate) fn pick<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| raw.get(key))
        .find(|value| !value.is_null())
}

/// Extract a text field. Non-string scalars are stringified because some
/// report versions emit numeric identifiers.
pub(crate) fn text(raw: &Value, keys: &[&str]) -> Option<String> {
    match pick(raw, keys)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Extract a timestamp field, normalizing parsable forms and passing
/// unparsable strings through unchanged.
pub(crate) fn timestamp(raw: &Value, keys: &[&str]) -> Option<String> {
    text(raw, keys).map(|s| normalize_timestamp(&s))
}

/// Extract a monetary field as `f64`.
///
/// Absent, null, and non-numeric values coerce to `0.0`; numeric strings
/// parse. Money is never `None` and never raises.
pub(crate) fn money(raw: &Value, keys: &[&str]) -> f64 {
    match pick(raw, keys) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Extract an integer counter, defaulting to zero.
pub(crate) fn integer(raw: &Value, keys: &[&str]) -> i64 {
    match pick(raw, keys) {
        Some(Value::Number(n)) => n.as_i64().unwrap_or_else(|| {
            n.as_f64().map(|f| f as i64).unwrap_or(0)
        }),
        Some(Value::String(s)) => s.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    }
}
