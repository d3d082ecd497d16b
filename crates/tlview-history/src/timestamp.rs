//! Timestamp decoding shared by the segment and path normalizers.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde_json::Value;

/// Decode an export timestamp.
///
/// Accepts RFC 3339 strings (any offset), offset-less ISO strings (read as
/// UTC), and epoch milliseconds given as a number or a digit string.
pub(crate) fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => parse_timestamp_str(raw),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn parse_timestamp_str(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw
            .parse::<i64>()
            .ok()
            .and_then(DateTime::from_timestamp_millis);
    }
    None
}

/// Decode a minute offset, given as a number or a numeric string.
pub(crate) fn parse_offset_minutes(value: &Value) -> Option<Duration> {
    let minutes = value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()))?;
    if !minutes.is_finite() {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let millis = (minutes * 60_000.0).round() as i64;
    Duration::try_milliseconds(millis)
}
