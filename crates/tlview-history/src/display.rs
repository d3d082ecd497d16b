//! Human-readable timeline rows.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tlview_core::{LatLng, LocationRecord, RecordKind, TimeFormat};

use crate::geometry::marker_color;

/// `"2h 5m"` for spans of an hour or more, `"45m"` otherwise.
///
/// Spans where `end` precedes `start` render as `"0m"`.
#[must_use]
pub fn format_duration(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    let total_minutes = (end - start).num_minutes().max(0);
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Localized clock time with the zone abbreviation, e.g. `"14:05 PST"` or `"02:05 PM PST"`.
#[must_use]
pub fn format_time(ts: DateTime<Utc>, tz: Tz, format: TimeFormat) -> String {
    let pattern = match format {
        TimeFormat::TwentyFourHour => "%H:%M %Z",
        TimeFormat::TwelveHour => "%I:%M %p %Z",
    };
    ts.with_timezone(&tz).format(pattern).to_string()
}

/// One line of the day's timeline list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineRow {
    /// 1-based position, shared with the map marker label.
    pub index: usize,
    pub kind: RecordKind,
    pub name: String,
    pub start: String,
    pub end: String,
    pub duration: String,
    pub anchor: LatLng,
    pub place_id: Option<String>,
    pub color: &'static str,
}

#[must_use]
pub fn build_timeline_rows(
    records: &[&LocationRecord],
    tz: Tz,
    format: TimeFormat,
) -> Vec<TimelineRow> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| TimelineRow {
            index: i + 1,
            kind: record.kind(),
            name: record.display_name().to_string(),
            start: format_time(record.start_time(), tz, format),
            end: format_time(record.end_time(), tz, format),
            duration: format_duration(record.start_time(), record.end_time()),
            anchor: record.anchor(),
            place_id: record.place_id().map(str::to_string),
            color: marker_color(record.kind()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tlview_core::{ActivityRecord, VisitRecord};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, hour, minute, 0).unwrap()
    }

    #[test]
    fn duration_under_an_hour_shows_minutes_only() {
        assert_eq!(format_duration(at(8, 0), at(8, 45)), "45m");
        assert_eq!(format_duration(at(8, 0), at(8, 0)), "0m");
    }

    #[test]
    fn duration_over_an_hour_shows_hours_and_minutes() {
        assert_eq!(format_duration(at(8, 0), at(10, 5)), "2h 5m");
        assert_eq!(format_duration(at(8, 0), at(9, 0)), "1h 0m");
    }

    #[test]
    fn negative_duration_renders_as_zero() {
        assert_eq!(format_duration(at(9, 0), at(8, 0)), "0m");
    }

    #[test]
    fn formats_time_in_zone_with_abbreviation() {
        let la = chrono_tz::America::Los_Angeles;
        assert_eq!(format_time(at(22, 5), la, TimeFormat::TwentyFourHour), "14:05 PST");
        assert_eq!(format_time(at(22, 5), la, TimeFormat::TwelveHour), "02:05 PM PST");
        assert_eq!(format_time(at(8, 30), Tz::UTC, TimeFormat::TwentyFourHour), "08:30 UTC");
    }

    #[test]
    fn rows_are_numbered_and_labelled() {
        let visit = LocationRecord::Visit(VisitRecord {
            start_time: at(8, 0),
            end_time: at(9, 30),
            name: "Home".to_string(),
            place_id: Some("p1".to_string()),
            latitude: 1.0,
            longitude: 2.0,
        });
        let walk = LocationRecord::Activity(ActivityRecord {
            start_time: at(9, 30),
            end_time: at(9, 50),
            activity_label: "WALKING".to_string(),
            start_latitude: 1.0,
            start_longitude: 2.0,
            end_latitude: 3.0,
            end_longitude: 4.0,
        });
        let rows = build_timeline_rows(&[&visit, &walk], Tz::UTC, TimeFormat::TwentyFourHour);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].index, 1);
        assert_eq!(rows[0].name, "Home");
        assert_eq!(rows[0].duration, "1h 30m");
        assert_eq!(rows[0].place_id.as_deref(), Some("p1"));
        assert_eq!(rows[0].color, "#4285F4");
        assert_eq!(rows[1].index, 2);
        assert_eq!(rows[1].kind, RecordKind::Activity);
        assert_eq!(rows[1].start, "09:30 UTC");
        assert_eq!(rows[1].end, "09:50 UTC");
        assert_eq!(rows[1].color, "#FF0000");
    }
}
