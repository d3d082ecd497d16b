//! Per-segment normalization.
//!
//! A raw segment is classified into one known shape before any field is read.
//! Shapes are tried in a fixed order (timeline path, visit, activity); a
//! segment matching none of them, or one whose required fields are missing,
//! contributes no records.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tlview_core::records::{UNKNOWN_ACTIVITY, UNKNOWN_LOCATION};
use tlview_core::{ActivityRecord, LocationRecord, VisitRecord};

use crate::coords::parse_coordinates;
use crate::path::expand_path;
use crate::timestamp::parse_timestamp;

/// The recognised shape of one raw segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentShape<'a> {
    TimelinePath {
        points: &'a [Value],
        start_time: Option<DateTime<Utc>>,
    },
    Visit(&'a Value),
    Activity(&'a Value),
    Unrecognized,
}

/// Classify a segment by field presence, first match wins.
#[must_use]
pub fn classify_segment(segment: &Value) -> SegmentShape<'_> {
    if let Some(points) = segment.get("timelinePath").and_then(Value::as_array) {
        return SegmentShape::TimelinePath {
            points,
            start_time: segment.get("startTime").and_then(parse_timestamp),
        };
    }
    if let Some(visit) = segment.get("visit").filter(|v| v.is_object()) {
        return SegmentShape::Visit(visit);
    }
    if let Some(activity) = segment.get("activity").filter(|v| v.is_object()) {
        return SegmentShape::Activity(activity);
    }
    SegmentShape::Unrecognized
}

/// Normalize one raw segment into zero or more records.
#[must_use]
pub fn normalize_segment(segment: &Value) -> Vec<LocationRecord> {
    match classify_segment(segment) {
        SegmentShape::TimelinePath { points, start_time } => expand_path(points, start_time),
        SegmentShape::Visit(visit) => normalize_visit(segment, visit)
            .map(LocationRecord::Visit)
            .into_iter()
            .collect(),
        SegmentShape::Activity(activity) => normalize_activity(segment, activity)
            .map(LocationRecord::Activity)
            .into_iter()
            .collect(),
        SegmentShape::Unrecognized => {
            tracing::debug!("segment matches no known shape; skipping");
            Vec::new()
        }
    }
}

fn segment_span(segment: &Value) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = segment.get("startTime").and_then(parse_timestamp);
    let end = segment.get("endTime").and_then(parse_timestamp);
    if start.is_none() || end.is_none() {
        tracing::debug!("segment has unparsable startTime/endTime; skipping");
    }
    Some((start?, end?))
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `key` on `value`, treating an explicit JSON `null` as absent.
fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| !v.is_null())
}

fn normalize_visit(segment: &Value, visit: &Value) -> Option<VisitRecord> {
    let candidate = field(visit, "topCandidate")?;
    let place_location = field(candidate, "placeLocation")?;
    // Newer exports nest the coordinate under `latLng`.
    let location = field(place_location, "latLng").unwrap_or(place_location);
    let Some(position) = parse_coordinates(location) else {
        tracing::debug!("visit has unparsable placeLocation; skipping");
        return None;
    };
    let (start_time, end_time) = segment_span(segment)?;

    Some(VisitRecord {
        start_time,
        end_time,
        name: non_empty_str(candidate.get("semanticType"))
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
        place_id: non_empty_str(candidate.get("placeID"))
            .or_else(|| non_empty_str(candidate.get("placeId"))),
        latitude: position.latitude,
        longitude: position.longitude,
    })
}

fn normalize_activity(segment: &Value, activity: &Value) -> Option<ActivityRecord> {
    let has_direct_coordinates = field(activity, "start")
        .and_then(|start| field(start, "latLng"))
        .is_some();
    let holder = if has_direct_coordinates {
        activity
    } else {
        field(activity, "topCandidate")?
    };

    let endpoint = |key: &str| {
        let raw = field(holder, key)?;
        parse_coordinates(field(raw, "latLng").unwrap_or(raw))
    };
    let (Some(start), Some(end)) = (endpoint("start"), endpoint("end")) else {
        tracing::debug!("activity has unparsable start/end; skipping");
        return None;
    };
    let (start_time, end_time) = segment_span(segment)?;

    let activity_label =
        non_empty_str(holder.get("type")).unwrap_or_else(|| UNKNOWN_ACTIVITY.to_string());

    Some(ActivityRecord {
        start_time,
        end_time,
        activity_label,
        start_latitude: start.latitude,
        start_longitude: start.longitude,
        end_latitude: end.latitude,
        end_longitude: end.longitude,
    })
}

#[cfg(test)]
#[path = "segment_test.rs"]
mod tests;
