//! Coordinate decoding for the three encodings found in exports.
//!
//! - degree strings: `"37.4220°, -122.0841°"`
//! - `geo:` URIs: `"geo:37.4220,-122.0841"`
//! - objects with `latitude`/`lat` and `longitude`/`lng` fields
//!
//! A value that cannot be decoded yields `None`; callers drop the record that
//! needed it.

use serde_json::Value;
use tlview_core::LatLng;

/// Decode a coordinate value in any supported encoding.
///
/// Returns `None` for unsupported value types, malformed strings and
/// non-finite numbers.
#[must_use]
pub fn parse_coordinates(value: &Value) -> Option<LatLng> {
    match value {
        Value::String(raw) => parse_coordinate_str(raw),
        Value::Object(map) => {
            let latitude = map
                .get("latitude")
                .and_then(as_degrees)
                .or_else(|| map.get("lat").and_then(as_degrees))?;
            let longitude = map
                .get("longitude")
                .and_then(as_degrees)
                .or_else(|| map.get("lng").and_then(as_degrees))?;
            LatLng::new(latitude, longitude)
        }
        _ => None,
    }
}

/// Decode a degree string or `geo:` URI.
///
/// Only the first two comma-separated components are read, so a `geo:` URI
/// carrying an altitude still decodes. URI parameters after `;` are ignored.
#[must_use]
pub fn parse_coordinate_str(raw: &str) -> Option<LatLng> {
    let trimmed = raw.trim();
    let body = if trimmed.contains('°') {
        trimmed
    } else {
        let without_scheme = trimmed.strip_prefix("geo:").unwrap_or(trimmed);
        without_scheme
            .split_once(';')
            .map_or(without_scheme, |(coords, _params)| coords)
    };

    let mut parts = body.split(',');
    let latitude = parse_component(parts.next()?)?;
    let longitude = parse_component(parts.next()?)?;
    LatLng::new(latitude, longitude)
}

fn parse_component(part: &str) -> Option<f64> {
    part.replace('°', "").trim().parse::<f64>().ok()
}

/// Numeric field value, accepting numbers and numeric strings.
fn as_degrees(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(parse_component))
}
