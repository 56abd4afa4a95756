//! Per-item spaced-repetition schedule
//!
//! The schedule is updated on every word answer and persisted, but it does
//! not influence which item is selected next; selection is driven by
//! weakness alone.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::MS_PER_DAY;

pub const MIN_EASE: f64 = 1.3;
pub const MAX_EASE: f64 = 2.5;
pub const EASE_BONUS: f64 = 0.1;
pub const EASE_PENALTY: f64 = 0.15;
pub const MIN_INTERVAL_DAYS: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SrsRecord {
    pub last_review_ms: Option<i64>,
    pub interval_days: u32,
    pub ease_factor: f64,
}

impl Default for SrsRecord {
    fn default() -> Self {
        Self {
            last_review_ms: None,
            interval_days: MIN_INTERVAL_DAYS,
            ease_factor: MAX_EASE,
        }
    }
}

impl SrsRecord {
    /// Applies one answer to the schedule
    pub fn review(&mut self, correct: bool, now_ms: i64) {
        if correct {
            match self.last_review_ms {
                None => self.interval_days = MIN_INTERVAL_DAYS,
                Some(_) => {
                    self.interval_days = round_days(self.interval_days as f64 * self.ease_factor);
                    self.ease_factor = (self.ease_factor + EASE_BONUS).min(MAX_EASE);
                }
            }
        } else {
            self.interval_days = round_days(self.interval_days as f64 * 0.5).max(MIN_INTERVAL_DAYS);
            self.ease_factor = (self.ease_factor - EASE_PENALTY).max(MIN_EASE);
        }
        self.last_review_ms = Some(now_ms);
    }

    /// Restores the documented bounds on a record read from storage
    pub fn sanitized(mut self) -> Self {
        if !self.ease_factor.is_finite() {
            self.ease_factor = MAX_EASE;
        }
        self.ease_factor = self.ease_factor.clamp(MIN_EASE, MAX_EASE);
        self.interval_days = self.interval_days.max(MIN_INTERVAL_DAYS);
        self
    }

    /// When the next review falls due; `None` for never-reviewed items
    pub fn due_at_ms(&self) -> Option<i64> {
        self.last_review_ms
            .map(|last| last.saturating_add(self.interval_days as i64 * MS_PER_DAY))
    }

    /// Never-reviewed items count as due
    pub fn is_due(&self, now_ms: i64) -> bool {
        self.due_at_ms().map_or(true, |due| now_ms >= due)
    }
}

/// Half-away-from-zero rounding, saturating into the `u32` day range
fn round_days(days: f64) -> u32 {
    if !days.is_finite() || days <= 0.0 {
        return 0;
    }
    days.round().min(u32::MAX as f64) as u32
}

/// SRS records for every item, keyed by source text
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SrsScheduler {
    records: HashMap<String, SrsRecord>,
}

impl SrsScheduler {
    pub fn from_records(records: HashMap<String, SrsRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|(key, record)| (key, record.sanitized()))
            .collect();
        Self { records }
    }

    pub fn ensure(&mut self, key: &str) -> &mut SrsRecord {
        self.records.entry(key.to_string()).or_default()
    }

    pub fn get(&self, key: &str) -> Option<&SrsRecord> {
        self.records.get(key)
    }

    pub fn records(&self) -> &HashMap<String, SrsRecord> {
        &self.records
    }

    pub fn update(&mut self, key: &str, correct: bool, now_ms: i64) -> SrsRecord {
        let record = self.ensure(key);
        record.review(correct, now_ms);
        record.clone()
    }
}
