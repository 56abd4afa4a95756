//! # flashdeck-algo - vocabulary progression engine
//!
//! Pure Rust implementation of the learning rules behind flashdeck:
//!
//! - **Bidirectional mastery** - per-direction correct-answer counters
//! - **Deck pipeline** - reserve queue, bounded active deck, graduated deck
//! - **Weighted selection** - weaker words are drawn more often
//! - **Lock gate** - milestone-triggered lock, lifted by an unlock streak
//! - **SRS bookkeeping** - ease/interval records per word
//! - **Sentence unlocking** - sentences open up once all their words graduate
//!
//! ## Module layout
//!
//! - [`types`] - vocabulary items, directions, config and constants
//! - [`sanitize`] - answer normalization and matching
//! - [`mastery`] / [`srs`] / [`streak`] / [`gate`] - per-learner counters
//! - [`deck`] - deck partitions and promotion
//! - [`selection`] / [`session`] - card sampling and practice sessions
//! - [`sentence`] - sentence eligibility and progress
//! - [`snapshot`] - persisted state with schema upgrades
//! - [`engine`] - the [`Engine`] context tying all of the above together
//!
//! ## Example
//!
//! ```rust
//! use flashdeck_algo::{DirectionMode, Engine, EngineConfig, Item, SessionKind};
//!
//! let words = vec![Item::new(0, "perro", "dog"), Item::new(1, "gato", "cat")];
//! let mut engine = Engine::new(words, Vec::new(), EngineConfig::default());
//!
//! let card = engine
//!     .start_session(SessionKind::Active, DirectionMode::SourceToTarget, 0)
//!     .unwrap();
//! let answer = if card.prompt() == "perro" { "dog" } else { "cat" };
//! let outcome = engine.submit_answer(answer, 1_000).unwrap();
//! assert!(outcome.correct);
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod deck;
pub mod engine;
pub mod gate;
pub mod mastery;
pub mod sanitize;
pub mod selection;
pub mod sentence;
pub mod session;
pub mod snapshot;
pub mod srs;
pub mod streak;
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use types::*;

pub use deck::{DeckManager, Placement, Promotion};
pub use engine::{AnswerOutcome, Engine, EngineError, ItemDetail, Progress, SessionRejection};
pub use gate::{GateState, LockGate};
pub use mastery::{MasteryRecord, MasteryTracker};
pub use session::{Card, CardPrompt, SessionStats};
pub use snapshot::{Snapshot, SnapshotError, SNAPSHOT_VERSION};
pub use srs::{SrsRecord, SrsScheduler};
pub use streak::StreakState;
