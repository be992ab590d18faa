//! Attendance report rendering.

use std::cmp::Ordering;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Asia::Dubai;

use crate::domain::entities::ReportRow;

pub const REPORT_HEADER: [&str; 3] = ["Name", "ID", "Checked in at (Dubai)"];
pub const REPORT_FILENAME: &str = "checkins_dubai.csv";

// en-GB medium month names; September is "Sept", not chrono's "%b".
const EN_GB_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sept", "Oct", "Nov", "Dec",
];

/// Quotes a CSV field when it contains a comma, double quote, or newline.
pub fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Parses a stored timestamp into an instant.
///
/// RFC 3339 values keep their offset; naive date-times and bare dates are read as UTC.
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, pattern) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Renders a stored timestamp in Dubai local time.
pub fn format_dubai(value: Option<&str>) -> String {
    match value {
        None | Some("") => String::new(),
        Some(raw) => match parse_instant(raw) {
            Some(instant) => format_en_gb(instant),
            None => raw.to_string(),
        },
    }
}

// en-GB medium date + short time in Dubai, e.g. "16 Oct 2026, 14:05".
fn format_en_gb(instant: DateTime<Utc>) -> String {
    let local = instant.with_timezone(&Dubai);
    let month = EN_GB_MONTHS[local.month0() as usize];
    format!(
        "{} {month} {}, {}",
        local.day(),
        local.year(),
        local.format("%H:%M")
    )
}

/// Orders rows by check-in instant ascending. Unparseable or absent timestamps
/// sort after parseable ones, then by their raw text.
pub fn sort_rows(rows: &mut [ReportRow]) {
    rows.sort_by(|a, b| {
        let left = a.checked_in_at.as_deref().and_then(parse_instant);
        let right = b.checked_in_at.as_deref().and_then(parse_instant);
        match (left, right) {
            (Some(l), Some(r)) => l.cmp(&r),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.checked_in_at.cmp(&b.checked_in_at),
        }
    });
}

/// Renders the report as CSV text, one line per row, without a trailing newline.
pub fn render_csv(rows: &[ReportRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(join_line(REPORT_HEADER.iter().map(|h| h.to_string())));
    for row in rows {
        lines.push(join_line([
            row.name.clone(),
            row.id.clone(),
            format_dubai(row.checked_in_at.as_deref()),
        ]));
    }
    lines.join("\n")
}

fn join_line(fields: impl IntoIterator<Item = String>) -> String {
    fields
        .into_iter()
        .map(|field| csv_escape(&field))
        .collect::<Vec<_>>()
        .join(",")
}
