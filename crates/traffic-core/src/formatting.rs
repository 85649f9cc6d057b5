use chrono::{NaiveDate, NaiveDateTime};

use crate::parser::TIMESTAMP_FORMAT;

/// Format an interval timestamp the same way it appears in the input file.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use traffic_core::formatting::format_timestamp;
///
/// let ts = NaiveDate::from_ymd_opt(2021, 12, 1)
///     .unwrap()
///     .and_hms_opt(5, 0, 0)
///     .unwrap();
/// assert_eq!(format_timestamp(ts), "2021-12-01T05:00:00");
/// ```
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Format a calendar day as `YYYY-MM-DD`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use traffic_core::formatting::format_day;
///
/// let day = NaiveDate::from_ymd_opt(2021, 12, 8).unwrap();
/// assert_eq!(format_day(day), "2021-12-08");
/// ```
pub fn format_day(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Format a span of whole minutes as a human-readable string.
///
/// * `< 60` minutes → `"30m"`
/// * `≥ 60` minutes, no remainder → `"2h"`
/// * `≥ 60` minutes, with remainder → `"1h 30m"`
///
/// # Examples
///
/// ```
/// use traffic_core::formatting::format_span;
///
/// assert_eq!(format_span(30),  "30m");
/// assert_eq!(format_span(60),  "1h");
/// assert_eq!(format_span(90),  "1h 30m");
/// assert_eq!(format_span(0),   "0m");
/// ```
pub fn format_span(minutes: i64) -> String {
    if minutes < 60 {
        format!("{}m", minutes)
    } else {
        let hours = minutes / 60;
        let mins = minutes % 60;
        if mins == 0 {
            format!("{}h", hours)
        } else {
            format!("{}h {}m", hours, mins)
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
