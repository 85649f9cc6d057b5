//! Insertion-ordered interval storage.
//!
//! Readings live in a `Vec` in arrival order, with a side index from
//! timestamp to position so both keyed lookup and positional lookback are
//! O(1).

use std::collections::HashMap;

use chrono::NaiveDateTime;
use traffic_core::models::Reading;

// ── Upsert ────────────────────────────────────────────────────────────────────

/// Outcome of [`IntervalStore::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// A new timestamp was appended at `position`.
    Inserted { position: usize },
    /// An existing timestamp at `position` had its count replaced.
    Replaced { position: usize, previous: u64 },
}

impl Upsert {
    pub fn position(&self) -> usize {
        match *self {
            Upsert::Inserted { position } | Upsert::Replaced { position, .. } => position,
        }
    }
}

// ── IntervalStore ─────────────────────────────────────────────────────────────

/// One entry per distinct timestamp, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct IntervalStore {
    entries: Vec<Reading>,
    positions: HashMap<NaiveDateTime, usize>,
}

impl IntervalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, timestamp: &NaiveDateTime) -> bool {
        self.position(timestamp).is_some()
    }

    /// Insertion position of `timestamp`, if stored.
    pub fn position(&self, timestamp: &NaiveDateTime) -> Option<usize> {
        self.positions.get(timestamp).copied()
    }

    /// Stored count for `timestamp`.
    pub fn count(&self, timestamp: &NaiveDateTime) -> Option<u64> {
        self.position(timestamp).map(|pos| self.entries[pos].count)
    }

    /// Append `reading`, or overwrite the count in place when its timestamp
    /// is already present. An overwritten entry keeps its original position.
    pub fn upsert(&mut self, reading: Reading) -> Upsert {
        if let Some(position) = self.position(&reading.timestamp) {
            let slot = &mut self.entries[position];
            let previous = slot.count;
            slot.count = reading.count;
            return Upsert::Replaced { position, previous };
        }

        let position = self.entries.len();
        self.entries.push(reading);
        self.positions.insert(reading.timestamp, position);
        Upsert::Inserted { position }
    }

    /// The `len` consecutive entries (in insertion order) that end at
    /// `end_position`. `None` when fewer than `len` entries precede it or
    /// `end_position` is out of range.
    pub fn run_ending_at(&self, end_position: usize, len: usize) -> Option<&[Reading]> {
        if len == 0 || end_position + 1 < len {
            return None;
        }
        self.entries.get(end_position + 1 - len..=end_position)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Reading> {
        self.entries.iter()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
