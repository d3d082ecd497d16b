//! Map features and viewport bounds for a day's records.

use serde::Serialize;
use tlview_core::{LatLng, LocationRecord, RecordKind};

pub const VISIT_COLOR: &str = "#4285F4";
pub const ACTIVITY_COLOR: &str = "#FF0000";

#[must_use]
pub fn marker_color(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Visit => VISIT_COLOR,
        RecordKind::Activity => ACTIVITY_COLOR,
    }
}

/// Smallest latitude/longitude box containing a set of points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    #[must_use]
    pub fn from_point(point: LatLng) -> Self {
        Self {
            south: point.latitude,
            west: point.longitude,
            north: point.latitude,
            east: point.longitude,
        }
    }

    #[must_use]
    pub fn extended(self, point: LatLng) -> Self {
        Self {
            south: self.south.min(point.latitude),
            west: self.west.min(point.longitude),
            north: self.north.max(point.latitude),
            east: self.east.max(point.longitude),
        }
    }

    /// `None` for an empty point set.
    pub fn around<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLng>,
    {
        points.into_iter().fold(None, |acc: Option<Self>, point| {
            Some(acc.map_or_else(|| Self::from_point(point), |b| b.extended(point)))
        })
    }

    #[must_use]
    pub fn center(&self) -> LatLng {
        LatLng {
            latitude: (self.south + self.north) / 2.0,
            longitude: (self.west + self.east) / 2.0,
        }
    }
}

/// Something the map layer draws.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "feature", rename_all = "snake_case")]
pub enum MapFeature {
    Marker {
        position: LatLng,
        label: usize,
        kind: RecordKind,
        color: &'static str,
    },
    Line {
        from: LatLng,
        to: LatLng,
        color: &'static str,
    },
}

/// Features for one record at 1-based position `label`.
///
/// Visits draw a marker; activities draw a line plus a marker at the start.
#[must_use]
pub fn record_features(record: &LocationRecord, label: usize) -> Vec<MapFeature> {
    let kind = record.kind();
    let marker = MapFeature::Marker {
        position: record.anchor(),
        label,
        kind,
        color: marker_color(kind),
    };
    match record.points().as_slice() {
        [from, to] => vec![
            MapFeature::Line {
                from: *from,
                to: *to,
                color: ACTIVITY_COLOR,
            },
            marker,
        ],
        _ => vec![marker],
    }
}

#[must_use]
pub fn map_features(records: &[&LocationRecord]) -> Vec<MapFeature> {
    records
        .iter()
        .enumerate()
        .flat_map(|(i, record)| record_features(record, i + 1))
        .collect()
}

/// Bounds covering every point of every record.
#[must_use]
pub fn day_bounds(records: &[&LocationRecord]) -> Option<Bounds> {
    Bounds::around(records.iter().flat_map(|record| record.points()))
}
