//! Incremental traffic aggregation.
//!
//! [`TrafficAggregator`] consumes readings one at a time, in input order, and
//! keeps the running total, per-day totals, every interval, and the least
//! busy 90-minute window up to date without re-scanning earlier data.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use traffic_core::error::{Result, TrafficError};
use traffic_core::models::{
    window_span, DuplicatePolicy, LeastBusyWindow, Reading, WINDOW_INTERVALS,
};

use crate::store::{IntervalStore, Upsert};

/// Number of intervals reported by [`TrafficAggregator::top_three_intervals`].
pub const TOP_INTERVALS: usize = 3;

// ── DailyTotal ────────────────────────────────────────────────────────────────

/// Cars counted on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub day: NaiveDate,
    pub total: u64,
}

// ── TrafficAggregator ─────────────────────────────────────────────────────────

/// Owns all aggregate state for one ingestion run.
#[derive(Debug, Clone, Default)]
pub struct TrafficAggregator {
    policy: DuplicatePolicy,
    total_cars: u64,
    daily: Vec<DailyTotal>,
    day_positions: HashMap<NaiveDate, usize>,
    intervals: IntervalStore,
    least_busy: Option<LeastBusyWindow>,
    readings_ingested: usize,
}

impl TrafficAggregator {
    /// Create an empty aggregator using [`DuplicatePolicy::Overwrite`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty aggregator with an explicit duplicate policy.
    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Fold one reading into every aggregate.
    ///
    /// Under [`DuplicatePolicy::Overwrite`] a repeated timestamp replaces the
    /// stored interval count but its count is still added to the running and
    /// per-day totals. Under [`DuplicatePolicy::Reject`] a repeated timestamp
    /// fails with [`TrafficError::DuplicateTimestamp`] before any state
    /// changes. A count that would push a total past `u64::MAX` fails with
    /// [`TrafficError::CountOverflow`], also before any state changes.
    pub fn ingest(&mut self, reading: Reading) -> Result<()> {
        if self.policy == DuplicatePolicy::Reject && self.intervals.contains(&reading.timestamp) {
            return Err(TrafficError::DuplicateTimestamp {
                timestamp: reading.timestamp,
            });
        }

        let overflow = || TrafficError::CountOverflow {
            timestamp: reading.timestamp,
        };
        let total_cars = self
            .total_cars
            .checked_add(reading.count)
            .ok_or_else(overflow)?;
        let day = reading.day();
        let day_position = self.day_positions.get(&day).copied();
        let day_total = match day_position {
            Some(pos) => self.daily[pos]
                .total
                .checked_add(reading.count)
                .ok_or_else(overflow)?,
            None => reading.count,
        };

        self.total_cars = total_cars;
        match day_position {
            Some(pos) => self.daily[pos].total = day_total,
            None => {
                self.day_positions.insert(day, self.daily.len());
                self.daily.push(DailyTotal {
                    day,
                    total: day_total,
                });
            }
        }

        let upsert = self.intervals.upsert(reading);
        if let Upsert::Replaced { previous, .. } = upsert {
            warn!(
                "Timestamp {} seen again; interval count {} replaced by {}",
                reading.timestamp, previous, reading.count
            );
        }

        self.evaluate_window(upsert.position());
        self.readings_ingested += 1;
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    /// Sum of every ingested count.
    pub fn total_cars(&self) -> u64 {
        self.total_cars
    }

    /// Per-day totals in first-seen order.
    pub fn daily_totals(&self) -> &[DailyTotal] {
        &self.daily
    }

    /// The `n` busiest intervals, count descending. Equal counts keep their
    /// insertion order.
    pub fn top_intervals(&self, n: usize) -> Vec<Reading> {
        if n == 0 || self.intervals.is_empty() {
            return Vec::new();
        }
        let mut ranked: Vec<Reading> = self.intervals.iter().copied().collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(n);
        ranked
    }

    /// The three busiest intervals (fewer if fewer were ingested).
    pub fn top_three_intervals(&self) -> Vec<Reading> {
        self.top_intervals(TOP_INTERVALS)
    }

    /// The cheapest contiguous window found so far, or `None` when no three
    /// intervals spanning exactly 60 minutes have been ingested yet.
    pub fn least_busy_window(&self) -> Option<&LeastBusyWindow> {
        self.least_busy.as_ref()
    }

    /// Stored intervals in insertion order.
    pub fn intervals(&self) -> &IntervalStore {
        &self.intervals
    }

    /// Number of distinct timestamps held.
    pub fn interval_count(&self) -> usize {
        self.intervals.len()
    }

    /// Number of successful [`ingest`](Self::ingest) calls, duplicates
    /// included.
    pub fn readings_ingested(&self) -> usize {
        self.readings_ingested
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Look back from `end_position` at the two entries inserted just before
    /// it. Only the endpoints are checked for the 60-minute span; the middle
    /// timestamp is not validated.
    fn evaluate_window(&mut self, end_position: usize) {
        let Some(run) = self.intervals.run_ending_at(end_position, WINDOW_INTERVALS) else {
            return;
        };

        let first = run[0].timestamp;
        let last = run[WINDOW_INTERVALS - 1].timestamp;
        if last - first != window_span() {
            return;
        }

        // Stored counts never sum past the running total, which is checked
        // on ingest, so this only bails on a corrupted store.
        let Some(total) = run
            .iter()
            .try_fold(0u64, |acc, r| acc.checked_add(r.count))
        else {
            return;
        };
        if let Some(best) = &self.least_busy {
            if total >= best.total {
                return;
            }
        }

        debug!(
            "New least busy window {} .. {} with {} cars",
            first, last, total
        );
        self.least_busy = Some(LeastBusyWindow {
            intervals: std::array::from_fn(|i| run[i].timestamp),
            total,
        });
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
