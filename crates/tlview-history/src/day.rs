//! Per-day selection and navigation over a loaded collection.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tlview_core::{LocationRecord, RecordKind};

/// Calendar day of `ts` in zone `tz`.
#[must_use]
pub fn local_day(ts: DateTime<Utc>, tz: Tz) -> NaiveDate {
    ts.with_timezone(&tz).date_naive()
}

/// Records starting on `date` in zone `tz`, sorted ascending by start time.
///
/// The sort is stable, so records sharing a start time keep load order.
#[must_use]
pub fn records_for_day(
    records: &[LocationRecord],
    date: NaiveDate,
    tz: Tz,
) -> Vec<&LocationRecord> {
    let mut day: Vec<&LocationRecord> = records
        .iter()
        .filter(|record| local_day(record.start_time(), tz) == date)
        .collect();
    day.sort_by_key(|record| record.start_time());
    day
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub visits: usize,
    pub activities: usize,
}

impl DaySummary {
    #[must_use]
    pub fn total(&self) -> usize {
        self.visits + self.activities
    }
}

/// Every day with at least one record, ascending.
#[must_use]
pub fn available_days(records: &[LocationRecord], tz: Tz) -> Vec<DaySummary> {
    let mut days: BTreeMap<NaiveDate, DaySummary> = BTreeMap::new();
    for record in records {
        let date = local_day(record.start_time(), tz);
        let summary = days.entry(date).or_insert(DaySummary {
            date,
            visits: 0,
            activities: 0,
        });
        match record.kind() {
            RecordKind::Visit => summary.visits += 1,
            RecordKind::Activity => summary.activities += 1,
        }
    }
    days.into_values().collect()
}

/// Move `delta` days forward (negative for backward).
#[must_use]
pub fn shift_day(date: NaiveDate, delta: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::try_days(delta)?)
}

/// Parse a `YYYY-MM-DD` day.
#[must_use]
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}
