//! Turns one raw `<timestamp> <count>` line into a [`Reading`].

use std::sync::OnceLock;

use chrono::{NaiveDateTime, Timelike};
use regex::Regex;

use crate::error::{ParseErrorKind, Result, TrafficError};
use crate::models::Reading;

/// `strftime` pattern of the interval timestamp, e.g. `2021-12-01T05:00:00`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// chrono accepts single-digit fields for several specifiers, so the shape is
/// checked before handing the token over.
fn timestamp_shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}$").expect("regex is valid")
    })
}

/// Parse a single input line.
///
/// The first two whitespace-separated tokens are used; anything after them is
/// ignored. Errors carry line number 0, see [`TrafficError::at_line`].
pub fn parse_line(line: &str) -> Result<Reading> {
    let fail = |reason: ParseErrorKind| TrafficError::Parse {
        line: 0,
        content: line.to_string(),
        reason,
    };

    let mut tokens = line.split_whitespace();
    let (Some(ts_token), Some(count_token)) = (tokens.next(), tokens.next()) else {
        let found = line.split_whitespace().count();
        return Err(fail(ParseErrorKind::MissingTokens { found }));
    };

    let timestamp = parse_timestamp(ts_token)
        .ok_or_else(|| fail(ParseErrorKind::InvalidTimestamp(ts_token.to_string())))?;
    let count = parse_count(count_token)
        .ok_or_else(|| fail(ParseErrorKind::InvalidCount(count_token.to_string())))?;

    Ok(Reading::new(timestamp, count))
}

/// Parse a `YYYY-MM-DDTHH:MM:SS` token. Returns `None` on any mismatch,
/// including out-of-range fields such as month 13 or second 60.
pub fn parse_timestamp(token: &str) -> Option<NaiveDateTime> {
    if !timestamp_shape().is_match(token) {
        return None;
    }
    // chrono reads second 60 as a leap second stored in the nanosecond field.
    NaiveDateTime::parse_from_str(token, TIMESTAMP_FORMAT)
        .ok()
        .filter(|ts| ts.nanosecond() < 1_000_000_000)
}

/// Parse a vehicle count: ASCII digits only, no sign.
fn parse_count(token: &str) -> Option<u64> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}
