//! Bidirectional mastery tracking
//!
//! Each item keeps one correctness counter per translation direction. A
//! counter moves by one per answer and never leaves `[0, K]`; the item is
//! mastered once both counters sit at `K`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Direction, REQUIRED_PER_DIRECTION};

/// Per-item correctness counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryRecord {
    pub source_to_target: u8,
    pub target_to_source: u8,
}

impl MasteryRecord {
    pub fn new(source_to_target: u8, target_to_source: u8) -> Self {
        Self {
            source_to_target,
            target_to_source,
        }
    }

    /// Legacy single-count records apply the same count to both directions
    pub fn from_legacy_count(count: i64, required: u8) -> Self {
        let clamped = count.clamp(0, required as i64) as u8;
        Self::new(clamped, clamped)
    }

    pub fn get(&self, direction: Direction) -> u8 {
        match direction {
            Direction::SourceToTarget => self.source_to_target,
            Direction::TargetToSource => self.target_to_source,
        }
    }

    fn slot(&mut self, direction: Direction) -> &mut u8 {
        match direction {
            Direction::SourceToTarget => &mut self.source_to_target,
            Direction::TargetToSource => &mut self.target_to_source,
        }
    }

    pub fn clamped(self, required: u8) -> Self {
        Self::new(
            self.source_to_target.min(required),
            self.target_to_source.min(required),
        )
    }

    pub fn is_mastered(&self, required: u8) -> bool {
        self.source_to_target >= required && self.target_to_source >= required
    }

    /// `2K - (s2t + t2s)`; higher means less mastered
    pub fn weakness(&self, required: u8) -> u32 {
        let total = self.source_to_target as u32 + self.target_to_source as u32;
        (2 * required as u32).saturating_sub(total)
    }
}

/// Owner of every item's [`MasteryRecord`], keyed by source text
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MasteryTracker {
    records: HashMap<String, MasteryRecord>,
    required: u8,
}

impl Default for MasteryTracker {
    fn default() -> Self {
        Self::new(REQUIRED_PER_DIRECTION)
    }
}

impl MasteryTracker {
    pub fn new(required: u8) -> Self {
        Self {
            records: HashMap::new(),
            required,
        }
    }

    /// Rebuilds a tracker from persisted records, clamping each to `[0, K]`
    pub fn from_records(records: HashMap<String, MasteryRecord>, required: u8) -> Self {
        let records = records
            .into_iter()
            .map(|(key, record)| (key, record.clamped(required)))
            .collect();
        Self { records, required }
    }

    /// Creates a fresh record for `key` if none exists yet
    pub fn ensure(&mut self, key: &str) -> &mut MasteryRecord {
        self.records.entry(key.to_string()).or_default()
    }

    pub fn get(&self, key: &str) -> MasteryRecord {
        self.records.get(key).copied().unwrap_or_default()
    }

    pub fn records(&self) -> &HashMap<String, MasteryRecord> {
        &self.records
    }

    /// Moves the `direction` counter up on a correct answer, down otherwise
    pub fn record_answer(&mut self, key: &str, direction: Direction, correct: bool) -> MasteryRecord {
        let required = self.required;
        let record = self.ensure(key);
        let slot = record.slot(direction);
        *slot = if correct {
            slot.saturating_add(1).min(required)
        } else {
            slot.saturating_sub(1)
        };
        *record
    }

    pub fn is_mastered(&self, key: &str) -> bool {
        self.get(key).is_mastered(self.required)
    }

    pub fn weakness(&self, key: &str) -> u32 {
        self.get(key).weakness(self.required)
    }
}
