//! Normalized location-history records.
//!
//! Every export shape is reduced to one of two record kinds: a stay at a place
//! ([`VisitRecord`]) or a movement between two points ([`ActivityRecord`]).
//! Coordinates held by a record are always finite decimal degrees.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name used for a visit whose source carries no semantic type.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";
/// Label used for an activity whose source carries no type.
pub const UNKNOWN_ACTIVITY: &str = "Unknown Activity";
/// Label carried by every record derived from a raw point path.
pub const MOVEMENT_LABEL: &str = "Movement";

/// A finite latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLng {
    /// Returns `None` unless both components are finite.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        (latitude.is_finite() && longitude.is_finite()).then_some(Self {
            latitude,
            longitude,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub name: String,
    #[serde(rename = "placeId")]
    pub place_id: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(rename = "activity")]
    pub activity_label: String,
    pub start_latitude: f64,
    pub start_longitude: f64,
    pub end_latitude: f64,
    pub end_longitude: f64,
}

/// One entry of the loaded timeline, tagged by `type` when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LocationRecord {
    Visit(VisitRecord),
    Activity(ActivityRecord),
}

/// Discriminant of a [`LocationRecord`], handy for styling and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Visit,
    Activity,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Visit => write!(f, "visit"),
            RecordKind::Activity => write!(f, "activity"),
        }
    }
}

impl LocationRecord {
    #[must_use]
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Visit(_) => RecordKind::Visit,
            Self::Activity(_) => RecordKind::Activity,
        }
    }

    #[must_use]
    pub fn start_time(&self) -> DateTime<Utc> {
        match self {
            Self::Visit(v) => v.start_time,
            Self::Activity(a) => a.start_time,
        }
    }

    #[must_use]
    pub fn end_time(&self) -> DateTime<Utc> {
        match self {
            Self::Visit(v) => v.end_time,
            Self::Activity(a) => a.end_time,
        }
    }

    /// Visit name or activity label, with placeholders for blank values.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Visit(v) if v.name.trim().is_empty() => UNKNOWN_LOCATION,
            Self::Visit(v) => &v.name,
            Self::Activity(a) if a.activity_label.trim().is_empty() => MOVEMENT_LABEL,
            Self::Activity(a) => &a.activity_label,
        }
    }

    #[must_use]
    pub fn place_id(&self) -> Option<&str> {
        match self {
            Self::Visit(v) => v.place_id.as_deref(),
            Self::Activity(_) => None,
        }
    }

    /// The point a record is pinned to: the visit position or the activity start.
    #[must_use]
    pub fn anchor(&self) -> LatLng {
        match self {
            Self::Visit(v) => LatLng {
                latitude: v.latitude,
                longitude: v.longitude,
            },
            Self::Activity(a) => LatLng {
                latitude: a.start_latitude,
                longitude: a.start_longitude,
            },
        }
    }

    /// All points a record touches, in travel order.
    #[must_use]
    pub fn points(&self) -> Vec<LatLng> {
        match self {
            Self::Visit(_) => vec![self.anchor()],
            Self::Activity(a) => vec![
                self.anchor(),
                LatLng {
                    latitude: a.end_latitude,
                    longitude: a.end_longitude,
                },
            ],
        }
    }
}
