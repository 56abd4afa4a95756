//! Practice session state and the session clock
//!
//! Elapsed time and throughput are pure functions of the start time, the
//! current time and the number of cards consumed; nothing here ticks.

use serde::{Deserialize, Serialize};

use crate::selection::{UniformPool, WeightedPool};
use crate::types::{Direction, DirectionMode, Item, SentenceId, SessionKind};

/// A card as held by a session. Serializes as [`CardPrompt`], which leaves
/// out the answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(into = "CardPrompt")]
pub enum Card {
    Word {
        item: Item,
        direction: Direction,
        prompt: String,
        /// The item still has some mastery left to earn
        weak: bool,
    },
    Sentence {
        sentence_id: SentenceId,
        prompt: String,
    },
}

/// What the learner is shown for a [`Card`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CardPrompt {
    #[serde(rename_all = "camelCase")]
    Word {
        item_id: u32,
        direction: Direction,
        prompt: String,
        weak: bool,
    },
    #[serde(rename_all = "camelCase")]
    Sentence {
        sentence_id: SentenceId,
        prompt: String,
    },
}

impl From<Card> for CardPrompt {
    fn from(card: Card) -> Self {
        match card {
            Card::Word {
                item,
                direction,
                prompt,
                weak,
            } => Self::Word {
                item_id: item.id,
                direction,
                prompt,
                weak,
            },
            Card::Sentence {
                sentence_id,
                prompt,
            } => Self::Sentence {
                sentence_id,
                prompt,
            },
        }
    }
}

impl Card {
    pub fn word(item: Item, direction: Direction, weak: bool) -> Self {
        let prompt = match direction {
            Direction::SourceToTarget => item.source_text.clone(),
            Direction::TargetToSource => item.target_text.clone(),
        };
        Self::Word {
            item,
            direction,
            prompt,
            weak,
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            Self::Word { prompt, .. } | Self::Sentence { prompt, .. } => prompt,
        }
    }
}

/// Remaining cards of a session, by sampling policy
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionPool {
    Weighted(WeightedPool),
    Uniform(UniformPool<Item>),
    Sentences(UniformPool<SentenceId>),
}

impl SessionPool {
    pub fn len(&self) -> usize {
        match self {
            Self::Weighted(pool) => pool.len(),
            Self::Uniform(pool) => pool.len(),
            Self::Sentences(pool) => pool.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub kind: SessionKind,
    pub direction_mode: DirectionMode,
    pub pool: SessionPool,
    pub current: Option<Card>,
    pub started_at_ms: i64,
    initial_len: usize,
}

impl Session {
    pub fn new(kind: SessionKind, direction_mode: DirectionMode, pool: SessionPool, started_at_ms: i64) -> Self {
        let initial_len = pool.len();
        Self {
            kind,
            direction_mode,
            pool,
            current: None,
            started_at_ms,
            initial_len,
        }
    }

    pub fn initial_len(&self) -> usize {
        self.initial_len
    }

    /// Initial size minus what is left, not counting the card on screen
    pub fn cards_completed(&self) -> usize {
        let shown = usize::from(self.current.is_some());
        self.initial_len
            .saturating_sub(self.pool.len())
            .saturating_sub(shown)
    }

    pub fn stats(&self, now_ms: i64) -> SessionStats {
        let elapsed = elapsed_seconds(self.started_at_ms, now_ms);
        let completed = self.cards_completed();
        SessionStats {
            kind: self.kind,
            elapsed_seconds: elapsed,
            cards_completed: completed,
            cards_remaining: self.pool.len(),
            cards_per_minute: cards_per_minute(completed, elapsed),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub kind: SessionKind,
    pub elapsed_seconds: u64,
    pub cards_completed: usize,
    pub cards_remaining: usize,
    pub cards_per_minute: f64,
}

/// Whole seconds since the session started; clock skew reads as zero
pub fn elapsed_seconds(started_at_ms: i64, now_ms: i64) -> u64 {
    (now_ms.saturating_sub(started_at_ms).max(0) / 1000) as u64
}

pub fn cards_per_minute(cards_completed: usize, elapsed_seconds: u64) -> f64 {
    if cards_completed == 0 || elapsed_seconds == 0 {
        return 0.0;
    }
    cards_completed as f64 / (elapsed_seconds as f64 / 60.0)
}
