//! Common Types and Constants
//!
//! Shared data structures used across all engine modules.

use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Correct answers required in each direction before an item is mastered
pub const REQUIRED_PER_DIRECTION: u8 = 5;

/// Number of items kept in the active deck while the reserve lasts
pub const ACTIVE_DECK_SIZE: usize = 80;

/// The gate locks every time the graduated deck reaches a multiple of this
pub const LOCK_MILESTONE: usize = 50;

/// Consecutive correct graduated answers needed to open a locked gate
pub const UNLOCK_STREAK_REQUIRED: u32 = 100;

/// Milliseconds in one day, used by SRS due dates
pub const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

// ==================== Engine Config ====================

/// Tunable thresholds of the progression engine
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// K: correct answers required per direction
    pub required_per_direction: u8,
    /// N: bounded size of the active deck
    pub active_deck_size: usize,
    /// Graduated-deck size multiple that locks the gate
    pub lock_milestone: usize,
    /// Unlock streak threshold
    pub unlock_streak_required: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            required_per_direction: REQUIRED_PER_DIRECTION,
            active_deck_size: ACTIVE_DECK_SIZE,
            lock_milestone: LOCK_MILESTONE,
            unlock_streak_required: UNLOCK_STREAK_REQUIRED,
        }
    }
}

impl EngineConfig {
    /// Replaces degenerate values (zero thresholds) with the defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.required_per_direction == 0 {
            self.required_per_direction = defaults.required_per_direction;
        }
        if self.lock_milestone == 0 {
            self.lock_milestone = defaults.lock_milestone;
        }
        if self.unlock_streak_required == 0 {
            self.unlock_streak_required = defaults.unlock_streak_required;
        }
        self
    }
}

// ==================== Vocabulary ====================

/// Translation pair as supplied by the vocabulary source
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordEntry {
    #[serde(alias = "spanish")]
    pub source_text: String,
    #[serde(alias = "english")]
    pub target_text: String,
}

/// A vocabulary item; `source_text` is its identity key
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: u32,
    #[serde(alias = "spanish")]
    pub source_text: String,
    #[serde(alias = "english")]
    pub target_text: String,
}

impl Item {
    pub fn new(id: u32, source_text: impl Into<String>, target_text: impl Into<String>) -> Self {
        Self {
            id,
            source_text: source_text.into(),
            target_text: target_text.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.source_text
    }
}

/// Numbers vocabulary entries in frequency order, skipping blank sources
pub fn number_entries(entries: Vec<WordEntry>) -> Vec<Item> {
    entries
        .into_iter()
        .filter(|entry| !entry.source_text.trim().is_empty())
        .enumerate()
        .map(|(idx, entry)| Item::new(idx as u32, entry.source_text, entry.target_text))
        .collect()
}

/// Index of a sentence in the sentence source
pub type SentenceId = usize;

/// Full sentence translation pair
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sentence {
    #[serde(alias = "spanish")]
    pub source_text: String,
    #[serde(alias = "english")]
    pub target_text: String,
}

// ==================== Practice ====================

/// Translation direction of a single card
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    /// Prompt shows the source text, the answer is the target text
    SourceToTarget,
    /// Prompt shows the target text, the answer is the source text
    TargetToSource,
}

/// Direction policy chosen for a whole session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DirectionMode {
    #[default]
    SourceToTarget,
    TargetToSource,
    /// Each served card independently picks a direction
    Mixed,
}

/// Which pool a practice session draws from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionKind {
    Active,
    Graduated,
    Sentence,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Graduated => "graduated",
            Self::Sentence => "sentence",
        }
    }
}
