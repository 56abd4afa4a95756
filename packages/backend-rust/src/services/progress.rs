//! Owner of the learner's engine inside the server
//!
//! Every request locks the engine, applies one command and, for answers,
//! takes a snapshot before unlocking. Persistence and event fan-out happen
//! after the lock is released.

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::broadcast;

use flashdeck_algo::{
    AnswerOutcome, Card, DirectionMode, Engine, EngineConfig, EngineError, GateState, Item,
    ItemDetail, Progress, SessionKind, SessionRejection, SessionStats, Snapshot,
};

use crate::db::SnapshotStore;
use crate::vocabulary::Vocabulary;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Notifications pushed to `/api/events` subscribers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ProgressEvent {
    /// A word moved from the reserve into the active deck
    NewCard { item: Item },
    #[serde(rename_all = "camelCase")]
    DeckLocked {
        graduated_count: usize,
        unlock_streak_required: u32,
    },
    #[serde(rename_all = "camelCase")]
    DeckUnlocked { graduated_count: usize },
}

impl ProgressEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::NewCard { .. } => "new-card",
            Self::DeckLocked { .. } => "deck-locked",
            Self::DeckUnlocked { .. } => "deck-unlocked",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentSession {
    pub card: Card,
    pub stats: SessionStats,
}

pub struct ProgressService {
    engine: Mutex<Engine>,
    store: Option<SnapshotStore>,
    events: broadcast::Sender<ProgressEvent>,
}

impl ProgressService {
    pub fn new(engine: Engine, store: Option<SnapshotStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            engine: Mutex::new(engine),
            store,
            events,
        }
    }

    /// Restores the learner from the store, falling back to a fresh engine.
    ///
    /// A fresh engine started over an unreadable row continues numbering
    /// from that row's revision, so its saves replace it.
    pub async fn bootstrap(
        vocabulary: Vocabulary,
        config: EngineConfig,
        store: Option<SnapshotStore>,
    ) -> Self {
        let Vocabulary { words, sentences } = vocabulary;

        let mut unreadable_revision = None;
        let saved = match &store {
            Some(store) => match store.load(config.required_per_direction).await {
                Ok(saved) => saved,
                Err(err) => {
                    tracing::warn!(error = %err, "stored progress unreadable, starting fresh");
                    unreadable_revision = match store.revision().await {
                        Ok(revision) => revision,
                        Err(err) => {
                            tracing::warn!(error = %err, "failed to read stored revision");
                            None
                        }
                    };
                    None
                }
            },
            None => None,
        };

        let engine = match saved {
            Some(snapshot) => {
                tracing::info!(revision = snapshot.revision, "restored saved progress");
                Engine::restore(words, sentences, config, snapshot)
            }
            None => {
                let mut engine = Engine::new(words, sentences, config);
                if let Some(revision) = unreadable_revision {
                    engine.resume_revision_from(revision);
                }
                engine
            }
        };

        Self::new(engine, store)
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.events.subscribe()
    }

    pub fn progress(&self) -> Progress {
        self.engine.lock().progress()
    }

    pub fn item_detail(&self, source_text: &str) -> Option<ItemDetail> {
        self.engine.lock().item_detail(source_text, now_ms())
    }

    pub fn start_session(
        &self,
        kind: SessionKind,
        direction_mode: DirectionMode,
    ) -> Result<CurrentSession, SessionRejection> {
        let now = now_ms();
        let mut engine = self.engine.lock();
        let card = engine.start_session(kind, direction_mode, now).map_err(|rejection| {
            tracing::info!(kind = kind.as_str(), reason = %rejection, "session rejected");
            rejection
        })?;
        let stats = engine
            .session_stats(now)
            .ok_or(SessionRejection::EmptyDeck)?;
        tracing::debug!(kind = kind.as_str(), cards = stats.cards_remaining + 1, "session started");
        Ok(CurrentSession { card, stats })
    }

    pub fn current_session(&self) -> Option<CurrentSession> {
        let now = now_ms();
        let engine = self.engine.lock();
        let card = engine.current_card()?.clone();
        let stats = engine.session_stats(now)?;
        Some(CurrentSession { card, stats })
    }

    pub fn end_session(&self) -> Option<SessionStats> {
        let stats = self.engine.lock().end_session(now_ms());
        if let Some(stats) = &stats {
            tracing::debug!(
                kind = stats.kind.as_str(),
                completed = stats.cards_completed,
                "session ended"
            );
        }
        stats
    }

    pub async fn submit_answer(&self, typed: &str) -> Result<AnswerOutcome, EngineError> {
        let now = now_ms();
        let (outcome, snapshot, graduated_count, unlock_streak_required) = {
            let mut engine = self.engine.lock();
            let outcome = engine.submit_answer(typed, now)?;
            (
                outcome,
                engine.snapshot(now),
                engine.decks().graduated().len(),
                engine.config().unlock_streak_required,
            )
        };

        self.persist(&snapshot).await;

        if let Some(item) = outcome.introduced() {
            tracing::info!(word = %item.source_text, "new card introduced");
            self.publish(ProgressEvent::NewCard { item: item.clone() });
        }
        if outcome.promotion.is_some() && outcome.gate == GateState::Locked {
            tracing::info!(graduated = graduated_count, "active deck locked");
            self.publish(ProgressEvent::DeckLocked {
                graduated_count,
                unlock_streak_required,
            });
        }
        if outcome.unlocked {
            tracing::info!(graduated = graduated_count, "active deck unlocked");
            self.publish(ProgressEvent::DeckUnlocked { graduated_count });
        }

        Ok(outcome)
    }

    /// Failed writes are logged and dropped; the next answer writes a full
    /// snapshot again.
    async fn persist(&self, snapshot: &Snapshot) {
        let Some(store) = &self.store else {
            return;
        };
        match store.save(snapshot).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(revision = snapshot.revision, "stored progress is newer, snapshot not saved")
            }
            Err(err) => {
                tracing::warn!(error = %err, revision = snapshot.revision, "failed to save progress")
            }
        }
    }

    fn publish(&self, event: ProgressEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
