//! Expansion of raw point paths into point-to-point movement records.
//!
//! Used for `timelinePath` segments and for the top-level `rawSignals` array.
//! Each consecutive pair of points becomes one activity labelled
//! [`MOVEMENT_LABEL`]; the last point has no successor and emits nothing.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tlview_core::records::MOVEMENT_LABEL;
use tlview_core::{ActivityRecord, LatLng, LocationRecord};

use crate::coords::parse_coordinates;
use crate::timestamp::{parse_offset_minutes, parse_timestamp};

const OFFSET_FIELD: &str = "durationMinutesOffsetFromStartTime";

#[derive(Debug, Clone, Copy)]
struct ResolvedPoint {
    position: LatLng,
    time: DateTime<Utc>,
}

/// Expand an ordered point sequence into movement records.
///
/// `segment_start` is the owning segment's start time; raw signals have none
/// and rely on their own timestamps. Points are not re-sorted, so output is
/// time-ordered only when the input is.
#[must_use]
pub fn expand_path(points: &[Value], segment_start: Option<DateTime<Utc>>) -> Vec<LocationRecord> {
    let resolved: Vec<Option<ResolvedPoint>> = points
        .iter()
        .map(|point| resolve_point(point, segment_start))
        .collect();

    resolved
        .windows(2)
        .enumerate()
        .filter_map(|(index, pair)| match (pair[0], pair[1]) {
            (Some(from), Some(to)) => Some(LocationRecord::Activity(ActivityRecord {
                start_time: from.time,
                end_time: to.time,
                activity_label: MOVEMENT_LABEL.to_string(),
                start_latitude: from.position.latitude,
                start_longitude: from.position.longitude,
                end_latitude: to.position.latitude,
                end_longitude: to.position.longitude,
            })),
            _ => {
                tracing::debug!(index, "skipping path pair with unresolvable point");
                None
            }
        })
        .collect()
}

fn resolve_point(point: &Value, segment_start: Option<DateTime<Utc>>) -> Option<ResolvedPoint> {
    Some(ResolvedPoint {
        position: point_position(point)?,
        time: point_time(point, segment_start)?,
    })
}

/// `point` for timeline paths, `position.LatLng` for raw signals.
fn point_position(point: &Value) -> Option<LatLng> {
    point
        .get("point")
        .or_else(|| {
            let position = point.get("position")?;
            position.get("LatLng").or_else(|| position.get("latLng"))
        })
        .and_then(parse_coordinates)
}

/// Explicit time first, then a minute offset from the segment start, then the
/// segment start itself.
fn point_time(point: &Value, segment_start: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    let explicit = point
        .get("time")
        .or_else(|| point.get("position").and_then(|p| p.get("timestamp")))
        .and_then(parse_timestamp);
    if explicit.is_some() {
        return explicit;
    }

    let start = segment_start?;
    match point.get(OFFSET_FIELD).and_then(parse_offset_minutes) {
        Some(offset) => start.checked_add_signed(offset),
        None => Some(start),
    }
}
