//! Step-by-step replay of a day's records.
//!
//! Each step highlights the next record, draws its features and grows the
//! animation path. Timing belongs to the caller; [`PLAYBACK_STEP`] is the
//! cadence the viewer uses between frames.

use std::time::Duration;

use serde::Serialize;
use tlview_core::{LatLng, LocationRecord, RecordKind};

use crate::geometry::{record_features, Bounds, MapFeature};

pub const PLAYBACK_STEP: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackFrame {
    /// 0-based position of the highlighted record.
    pub index: usize,
    pub kind: RecordKind,
    pub name: String,
    /// Features added by this step.
    pub features: Vec<MapFeature>,
    /// Animation path so far, including this step's points.
    pub path: Vec<LatLng>,
    /// Viewport that fits `path`.
    pub bounds: Option<Bounds>,
}

/// Iterator over playback frames for an already filtered and sorted day.
#[derive(Debug, Clone)]
pub struct Playback<'a> {
    records: Vec<&'a LocationRecord>,
    next: usize,
    path: Vec<LatLng>,
}

impl<'a> Playback<'a> {
    #[must_use]
    pub fn new(records: Vec<&'a LocationRecord>) -> Self {
        Self {
            records,
            next: 0,
            path: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.next >= self.records.len()
    }
}

impl Iterator for Playback<'_> {
    type Item = PlaybackFrame;

    fn next(&mut self) -> Option<Self::Item> {
        let record = *self.records.get(self.next)?;
        let index = self.next;
        self.next += 1;

        self.path.extend(record.points());
        Some(PlaybackFrame {
            index,
            kind: record.kind(),
            name: record.display_name().to_string(),
            features: record_features(record, index + 1),
            path: self.path.clone(),
            bounds: Bounds::around(self.path.iter().copied()),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.records.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Playback<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tlview_core::{ActivityRecord, VisitRecord};

    fn records() -> (LocationRecord, LocationRecord) {
        let home = LocationRecord::Visit(VisitRecord {
            start_time: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            name: "Home".to_string(),
            place_id: None,
            latitude: 0.0,
            longitude: 0.0,
        });
        let drive = LocationRecord::Activity(ActivityRecord {
            start_time: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap(),
            activity_label: "IN_PASSENGER_VEHICLE".to_string(),
            start_latitude: 0.0,
            start_longitude: 0.0,
            end_latitude: 2.0,
            end_longitude: 3.0,
        });
        (home, drive)
    }

    #[test]
    fn frames_grow_the_path_and_bounds() {
        let (home, drive) = records();
        let frames: Vec<PlaybackFrame> = Playback::new(vec![&home, &drive]).collect();
        assert_eq!(frames.len(), 2);

        assert_eq!(frames[0].index, 0);
        assert_eq!(frames[0].name, "Home");
        assert_eq!(frames[0].path.len(), 1);
        assert_eq!(frames[0].features.len(), 1);

        assert_eq!(frames[1].index, 1);
        assert_eq!(frames[1].path.len(), 3);
        assert_eq!(frames[1].features.len(), 2);
        let bounds = frames[1].bounds.expect("bounds");
        assert_eq!(bounds.north, 2.0);
        assert_eq!(bounds.east, 3.0);
    }

    #[test]
    fn empty_day_has_no_frames() {
        let mut playback = Playback::new(Vec::new());
        assert!(playback.is_finished());
        assert!(playback.next().is_none());
    }

    #[test]
    fn reports_remaining_frames() {
        let (home, drive) = records();
        let mut playback = Playback::new(vec![&home, &drive]);
        assert_eq!(playback.len(), 2);
        playback.next();
        assert_eq!(playback.len(), 1);
        assert!(!playback.is_finished());
        playback.next();
        assert!(playback.is_finished());
    }
}
