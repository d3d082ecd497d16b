//! Plain-text and JSON rendering for CLI commands.

use std::io::{self, Write};

use chrono::NaiveDate;
use chrono_tz::Tz;
use tlview_core::{LocationRecord, TimeFormat};
use tlview_history::{
    available_days, build_timeline_rows, day_bounds, records_for_day, shift_day, Bounds, Playback,
};

fn fmt_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.to_string())
}

fn fmt_bounds(bounds: Option<Bounds>) -> String {
    bounds.map_or_else(
        || "-".to_string(),
        |b| {
            format!(
                "({:.5}, {:.5}) .. ({:.5}, {:.5})",
                b.south, b.west, b.north, b.east
            )
        },
    )
}

/// Timeline table for `date`.
pub(crate) fn day(
    out: &mut impl Write,
    records: &[LocationRecord],
    date: NaiveDate,
    tz: Tz,
    time_format: TimeFormat,
) -> io::Result<()> {
    let day = records_for_day(records, date, tz);

    writeln!(
        out,
        "{date} ({}) prev: {} next: {}",
        tz.name(),
        fmt_date(shift_day(date, -1)),
        fmt_date(shift_day(date, 1)),
    )?;
    if day.is_empty() {
        writeln!(out, "no records on {date}")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<4}{:<10}{:<16}{:<16}{:<10}NAME",
        "#", "TYPE", "START", "END", "DURATION"
    )?;
    for row in build_timeline_rows(&day, tz, time_format) {
        writeln!(
            out,
            "{:<4}{:<10}{:<16}{:<16}{:<10}{}",
            row.index,
            row.kind.to_string(),
            row.start,
            row.end,
            row.duration,
            row.name
        )?;
    }
    writeln!(out, "bounds: {}", fmt_bounds(day_bounds(&day)))
}

/// One line per day with records.
pub(crate) fn days(out: &mut impl Write, records: &[LocationRecord], tz: Tz) -> io::Result<()> {
    let summaries = available_days(records, tz);
    if summaries.is_empty() {
        return writeln!(out, "no records loaded");
    }

    writeln!(out, "{:<12}{:<8}{:<12}TOTAL", "DATE", "VISITS", "ACTIVITIES")?;
    for summary in &summaries {
        writeln!(
            out,
            "{:<12}{:<8}{:<12}{}",
            summary.date.to_string(),
            summary.visits,
            summary.activities,
            summary.total()
        )?;
    }
    Ok(())
}

/// Normalized records as pretty JSON, optionally limited to one day.
pub(crate) fn export(
    out: &mut impl Write,
    records: &[LocationRecord],
    date: Option<NaiveDate>,
    tz: Tz,
) -> anyhow::Result<()> {
    match date {
        Some(date) => {
            let day = records_for_day(records, date, tz);
            serde_json::to_writer_pretty(&mut *out, &day)?;
        }
        None => serde_json::to_writer_pretty(&mut *out, records)?,
    }
    writeln!(out)?;
    Ok(())
}

/// Frame-by-frame replay of `date`.
pub(crate) fn playback(
    out: &mut impl Write,
    records: &[LocationRecord],
    date: NaiveDate,
    tz: Tz,
) -> io::Result<()> {
    let frames = Playback::new(records_for_day(records, date, tz));
    let total = frames.len();
    if total == 0 {
        return writeln!(out, "no records on {date}");
    }

    for frame in frames {
        writeln!(
            out,
            "[{}/{total}] {} {}: path {} points, bounds {}",
            frame.index + 1,
            frame.kind,
            frame.name,
            frame.path.len(),
            fmt_bounds(frame.bounds),
        )?;
    }
    Ok(())
}
