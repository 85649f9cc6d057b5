use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Length of one reading's interval.
pub const INTERVAL_MINUTES: i64 = 30;

/// Number of half-hour intervals that make up one least-busy window.
pub const WINDOW_INTERVALS: usize = 3;

/// Minutes between the first and last interval start of a window. The
/// timestamps mark the start of each half hour, so 60 minutes between the
/// endpoints covers 90 minutes of traffic.
pub const WINDOW_SPAN_MINUTES: i64 = 60;

/// Window span as a [`chrono::Duration`].
pub fn window_span() -> Duration {
    Duration::minutes(WINDOW_SPAN_MINUTES)
}

/// One half-hour traffic reading parsed from a single input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// Start of the half-hour interval (no timezone, second precision).
    pub timestamp: NaiveDateTime,
    /// Number of cars counted during the interval.
    pub count: u64,
}

impl Reading {
    pub fn new(timestamp: NaiveDateTime, count: u64) -> Self {
        Self { timestamp, count }
    }

    /// Calendar day the interval belongs to.
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// The cheapest run of three contiguous intervals seen so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeastBusyWindow {
    /// Interval start times in chronological order.
    pub intervals: [NaiveDateTime; WINDOW_INTERVALS],
    /// Combined car count across the three intervals.
    pub total: u64,
}

impl LeastBusyWindow {
    pub fn first(&self) -> NaiveDateTime {
        self.intervals[0]
    }

    pub fn last(&self) -> NaiveDateTime {
        self.intervals[WINDOW_INTERVALS - 1]
    }
}

/// What to do when a timestamp that was already ingested shows up again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Replace the stored interval count in place, keeping its original
    /// position, while the running total and day total still grow by the
    /// new count.
    #[default]
    Overwrite,
    /// Fail ingestion with [`crate::error::TrafficError::DuplicateTimestamp`]
    /// and leave all aggregates untouched.
    Reject,
}

/// Rendering used for the final report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable sections on stdout.
    #[default]
    Text,
    /// Pretty-printed JSON document.
    Json,
}
