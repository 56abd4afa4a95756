//! Progression engine context
//!
//! [`Engine`] owns every piece of learner state: the deck partitions,
//! mastery and SRS records, streaks, the gate override, sentence progress
//! and the single running practice session. It is mutated only through
//! [`Engine::start_session`], [`Engine::submit_answer`] and
//! [`Engine::end_session`].

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::deck::{DeckManager, Placement, Promotion};
use crate::gate::{GateState, LockGate};
use crate::mastery::{MasteryRecord, MasteryTracker};
use crate::sanitize::{matches_answer, normalize};
use crate::selection::{resolve_direction, UniformPool, WeightedPool};
use crate::sentence::{SentenceProgress, SentenceUnlockChecker};
use crate::session::{Card, Session, SessionPool, SessionStats};
use crate::snapshot::Snapshot;
use crate::srs::{SrsRecord, SrsScheduler};
use crate::streak::{StreakController, StreakState};
use crate::types::{Direction, DirectionMode, EngineConfig, Item, Sentence, SessionKind};

// ==================== Errors & Rejections ====================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("no practice session is running")]
    NoSession,
    #[error("no card is waiting for an answer")]
    NoCard,
}

/// Expected refusals to start a session; shown to the learner as-is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionRejection {
    /// The gate is locked; active practice is unavailable
    Locked { unlock_streak_required: u32 },
    NoEligibleSentences,
    EmptyDeck,
}

impl SessionRejection {
    pub fn message(&self) -> String {
        match self {
            Self::Locked {
                unlock_streak_required,
            } => format!(
                "Open deck is locked! Achieve {unlock_streak_required} consecutive correct answers in the graduated deck to unlock."
            ),
            Self::NoEligibleSentences => {
                "No unlocked sentences yet. Earn words into the graduated deck to unlock sentences."
                    .to_string()
            }
            Self::EmptyDeck => "No cards in this deck.".to_string(),
        }
    }
}

impl std::fmt::Display for SessionRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

// ==================== Views ====================

/// Everything the presentation layer needs after an answer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub correct: bool,
    /// Accepted answer text, `;`-separated alternatives included
    pub expected: String,
    /// Updated counters of the answered word; `None` for sentences
    pub mastery: Option<MasteryRecord>,
    /// Correct-answer count of the answered sentence; `None` for words
    pub sentence_count: Option<u32>,
    pub streaks: StreakState,
    pub gate: GateState,
    pub promotion: Option<Promotion>,
    /// The answer completed the unlock streak
    pub unlocked: bool,
    /// Next card of the session; `None` once the session is over
    pub next_card: Option<Card>,
}

impl AnswerOutcome {
    pub fn introduced(&self) -> Option<&Item> {
        self.promotion.as_ref().and_then(|p| p.introduced.as_ref())
    }

    pub fn session_finished(&self) -> bool {
        self.next_card.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub active_count: usize,
    pub reserve_count: usize,
    pub graduated_count: usize,
    pub eligible_sentences: usize,
    pub completed_sentences: usize,
    pub mastered_sentences: usize,
    pub streaks: StreakState,
    pub gate: GateState,
    pub unlock_streak_required: u32,
    pub session: Option<SessionKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetail {
    pub item: Item,
    pub placement: Placement,
    pub mastery: MasteryRecord,
    pub mastered: bool,
    pub weakness: u32,
    pub srs: SrsRecord,
    pub due_at_ms: Option<i64>,
    pub due: bool,
}

// ==================== Engine ====================

pub struct Engine {
    config: EngineConfig,
    words: Vec<Item>,
    sentences: Vec<Sentence>,
    decks: DeckManager,
    mastery: MasteryTracker,
    srs: SrsScheduler,
    streaks: StreakController,
    gate: LockGate,
    sentence_progress: SentenceProgress,
    session: Option<Session>,
    revision: u64,
    rng: ChaCha8Rng,
}

impl Engine {
    /// Fresh learner: the first `active_deck_size` words become active
    pub fn new(words: Vec<Item>, sentences: Vec<Sentence>, config: EngineConfig) -> Self {
        let config = config.sanitized();
        let decks = DeckManager::initialize(&words, config.active_deck_size);
        let mut engine = Self {
            mastery: MasteryTracker::new(config.required_per_direction),
            srs: SrsScheduler::default(),
            streaks: StreakController::default(),
            gate: LockGate::new(config.lock_milestone),
            sentence_progress: SentenceProgress::default(),
            session: None,
            revision: 0,
            rng: ChaCha8Rng::seed_from_u64(default_seed()),
            config,
            words,
            sentences,
            decks,
        };
        engine.ensure_records();
        engine
    }

    /// Rebuilds a learner from a snapshot against the current word pool
    pub fn restore(
        words: Vec<Item>,
        sentences: Vec<Sentence>,
        config: EngineConfig,
        snapshot: Snapshot,
    ) -> Self {
        let config = config.sanitized();
        let mut decks = if snapshot.active_deck.is_empty() && snapshot.graduated_deck.is_empty() {
            DeckManager::initialize(&words, config.active_deck_size)
        } else {
            DeckManager::restore(&words, snapshot.active_deck, snapshot.graduated_deck)
        };
        decks.refill(config.active_deck_size);

        let mut engine = Self {
            mastery: MasteryTracker::from_records(
                snapshot.mastery.into_iter().collect::<HashMap<_, _>>(),
                config.required_per_direction,
            ),
            srs: SrsScheduler::from_records(snapshot.srs.into_iter().collect()),
            streaks: StreakController::from_state(snapshot.streaks),
            gate: LockGate::with_override(config.lock_milestone, snapshot.gate_override),
            sentence_progress: SentenceProgress::from_parts(
                snapshot.sentence_mastery,
                snapshot.completed_sentences,
            ),
            session: None,
            revision: snapshot.revision,
            rng: ChaCha8Rng::seed_from_u64(default_seed()),
            config,
            words,
            sentences,
            decks,
        };
        engine.ensure_records();
        engine
    }

    /// Reseeds the sampling RNG (for testing)
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    fn ensure_records(&mut self) {
        let keys: Vec<String> = self
            .words
            .iter()
            .chain(self.decks.active().iter())
            .chain(self.decks.graduated().iter())
            .map(|item| item.source_text.clone())
            .collect();
        for key in keys {
            self.mastery.ensure(&key);
            self.srs.ensure(&key);
        }
    }

    // ==================== Queries ====================

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn decks(&self) -> &DeckManager {
        &self.decks
    }

    pub fn mastery(&self) -> &MasteryTracker {
        &self.mastery
    }

    pub fn srs(&self) -> &SrsScheduler {
        &self.srs
    }

    pub fn streaks(&self) -> StreakState {
        self.streaks.state()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Continues revision numbering from `revision` when it is ahead, so the
    /// next snapshot supersedes a stored row this engine did not come from.
    pub fn resume_revision_from(&mut self, revision: u64) {
        self.revision = self.revision.max(revision);
    }

    pub fn gate_state(&self) -> GateState {
        self.gate.state(self.decks.graduated().len())
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.session.as_ref().and_then(|s| s.current.as_ref())
    }

    pub fn session_stats(&self, now_ms: i64) -> Option<SessionStats> {
        self.session.as_ref().map(|s| s.stats(now_ms))
    }

    pub fn eligible_sentences(&self) -> Vec<usize> {
        SentenceUnlockChecker::new(self.decks.graduated()).eligible_ids(&self.sentences)
    }

    pub fn progress(&self) -> Progress {
        Progress {
            active_count: self.decks.active().len(),
            reserve_count: self.decks.reserve().len(),
            graduated_count: self.decks.graduated().len(),
            eligible_sentences: self.eligible_sentences().len(),
            completed_sentences: self.sentence_progress.completed().len(),
            mastered_sentences: self
                .sentence_progress
                .mastered_count(self.config.required_per_direction as u32),
            streaks: self.streaks.state(),
            gate: self.gate_state(),
            unlock_streak_required: self.config.unlock_streak_required,
            session: self.session.as_ref().map(|s| s.kind),
        }
    }

    pub fn item_detail(&self, key: &str, now_ms: i64) -> Option<ItemDetail> {
        let item = self.decks.find(key)?.clone();
        let placement = self.decks.placement(key)?;
        let mastery = self.mastery.get(key);
        let srs = self.srs.get(key).cloned().unwrap_or_default();
        Some(ItemDetail {
            placement,
            mastered: mastery.is_mastered(self.config.required_per_direction),
            weakness: mastery.weakness(self.config.required_per_direction),
            due_at_ms: srs.due_at_ms(),
            due: srs.is_due(now_ms),
            item,
            mastery,
            srs,
        })
    }

    pub fn snapshot(&self, now_ms: i64) -> Snapshot {
        Snapshot {
            revision: self.revision,
            saved_at_ms: now_ms,
            active_deck: self.decks.active().to_vec(),
            graduated_deck: self.decks.graduated().to_vec(),
            mastery: self
                .mastery
                .records()
                .iter()
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
            srs: self
                .srs
                .records()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            sentence_mastery: self.sentence_progress.mastery().clone(),
            completed_sentences: self.sentence_progress.completed().clone(),
            streaks: self.streaks.state(),
            gate_override: self.gate.override_active(),
        }
    }

    // ==================== Commands ====================

    /// Starts a session, discarding any session already running
    pub fn start_session(
        &mut self,
        kind: SessionKind,
        direction_mode: DirectionMode,
        now_ms: i64,
    ) -> Result<Card, SessionRejection> {
        self.session = None;

        let pool = match kind {
            SessionKind::Active => {
                if self.gate_state().is_locked() {
                    return Err(SessionRejection::Locked {
                        unlock_streak_required: self.config.unlock_streak_required,
                    });
                }
                SessionPool::Weighted(WeightedPool::new(self.decks.active().to_vec()))
            }
            SessionKind::Graduated => SessionPool::Uniform(UniformPool::shuffled(
                self.decks.graduated().to_vec(),
                &mut self.rng,
            )),
            SessionKind::Sentence => {
                let eligible = self.eligible_sentences();
                let Some(&pick) = eligible.choose(&mut self.rng) else {
                    return Err(SessionRejection::NoEligibleSentences);
                };
                SessionPool::Sentences(UniformPool::shuffled(vec![pick], &mut self.rng))
            }
        };

        if pool.is_empty() {
            return Err(SessionRejection::EmptyDeck);
        }

        self.session = Some(Session::new(kind, direction_mode, pool, now_ms));
        self.advance().ok_or(SessionRejection::EmptyDeck)
    }

    /// Ends the running session, returning its final stats
    pub fn end_session(&mut self, now_ms: i64) -> Option<SessionStats> {
        self.session.take().map(|mut session| {
            session.current = None;
            session.stats(now_ms)
        })
    }

    /// Grades `typed` against the current card and applies every effect
    pub fn submit_answer(&mut self, typed: &str, now_ms: i64) -> Result<AnswerOutcome, EngineError> {
        let session = self.session.as_mut().ok_or(EngineError::NoSession)?;
        let kind = session.kind;
        let card = session.current.take().ok_or(EngineError::NoCard)?;

        let mut outcome = match card {
            Card::Word {
                item, direction, ..
            } => self.answer_word(kind, item, direction, typed, now_ms),
            Card::Sentence { sentence_id, .. } => self.answer_sentence(sentence_id, typed),
        };

        self.revision += 1;
        outcome.next_card = self.advance();
        outcome.gate = self.gate_state();
        Ok(outcome)
    }

    fn answer_word(
        &mut self,
        kind: SessionKind,
        item: Item,
        direction: Direction,
        typed: &str,
        now_ms: i64,
    ) -> AnswerOutcome {
        let expected = match direction {
            Direction::SourceToTarget => item.target_text.clone(),
            Direction::TargetToSource => item.source_text.clone(),
        };
        let correct = matches_answer(typed, &expected);
        let key = item.source_text.clone();
        let locked = self.gate_state().is_locked();
        let graduated_practice = kind == SessionKind::Graduated;

        let mastery = self.mastery.record_answer(&key, direction, correct);
        self.srs.update(&key, correct, now_ms);
        let streaks = self
            .streaks
            .record(correct, graduated_practice && locked, graduated_practice);

        let mut unlocked = false;
        if correct
            && graduated_practice
            && locked
            && streaks.unlock >= self.config.unlock_streak_required
        {
            self.gate.unlock();
            self.streaks.reset_unlock();
            unlocked = true;
        }

        let mut promotion = None;
        if correct && mastery.is_mastered(self.config.required_per_direction) {
            promotion = self.decks.promote(&key);
            if let Some(Promotion {
                introduced: Some(introduced),
                ..
            }) = &promotion
            {
                self.mastery.ensure(&introduced.source_text);
                self.srs.ensure(&introduced.source_text);
            }
            if promotion.is_some() {
                self.gate.on_promotion();
            }
        }

        if !correct && kind == SessionKind::Active {
            if let Some(Session {
                pool: SessionPool::Weighted(pool),
                ..
            }) = self.session.as_mut()
            {
                pool.put_back(item, &mut self.rng);
            }
        }

        AnswerOutcome {
            correct,
            expected,
            mastery: Some(mastery),
            sentence_count: None,
            streaks: self.streaks.state(),
            gate: self.gate_state(),
            promotion,
            unlocked,
            next_card: None,
        }
    }

    fn answer_sentence(&mut self, sentence_id: usize, typed: &str) -> AnswerOutcome {
        let expected = self
            .sentences
            .get(sentence_id)
            .map(|s| s.target_text.clone())
            .unwrap_or_default();
        let typed = normalize(typed);
        let correct = !typed.is_empty() && typed == normalize(&expected);

        self.streaks.record(correct, false, false);
        let sentence_count = if correct {
            self.sentence_progress.record_correct(sentence_id)
        } else {
            self.sentence_progress.count(sentence_id)
        };

        AnswerOutcome {
            correct,
            expected,
            mastery: None,
            sentence_count: Some(sentence_count),
            streaks: self.streaks.state(),
            gate: self.gate_state(),
            promotion: None,
            unlocked: false,
            next_card: None,
        }
    }

    /// Serves the next card, closing the session once its pool is empty
    fn advance(&mut self) -> Option<Card> {
        let session = self.session.as_mut()?;
        let required = self.config.required_per_direction;
        let mode = session.direction_mode;
        let mastery = &self.mastery;
        let rng = &mut self.rng;

        let card = match &mut session.pool {
            SessionPool::Weighted(pool) => pool
                .draw(|item| mastery.weakness(&item.source_text), rng)
                .map(|item| {
                    let weak = mastery.get(&item.source_text).weakness(required) > 0;
                    let direction = resolve_direction(mode, rng);
                    Card::word(item, direction, weak)
                }),
            SessionPool::Uniform(pool) => pool.draw().map(|item| {
                let direction = resolve_direction(mode, rng);
                Card::word(item, direction, false)
            }),
            SessionPool::Sentences(pool) => pool.draw().and_then(|sentence_id| {
                self.sentences.get(sentence_id).map(|sentence| Card::Sentence {
                    sentence_id,
                    prompt: sentence.source_text.clone(),
                })
            }),
        };

        match card {
            Some(card) => {
                session.current = Some(card.clone());
                Some(card)
            }
            None => {
                self.session = None;
                None
            }
        }
    }
}

/// Time-derived seed, as the sampling only needs to differ between runs
fn default_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(42)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    const NOW: i64 = 1_700_000_000_000;

    fn words(n: usize) -> Vec<Item> {
        (0..n)
            .map(|i| Item::new(i as u32, format!("w{i}"), format!("t{i}")))
            .collect()
    }

    fn config(required: u8, active: usize, milestone: usize, unlock: u32) -> EngineConfig {
        EngineConfig {
            required_per_direction: required,
            active_deck_size: active,
            lock_milestone: milestone,
            unlock_streak_required: unlock,
        }
    }

    fn engine(words: Vec<Item>, sentences: Vec<Sentence>, config: EngineConfig) -> Engine {
        let mut engine = Engine::new(words, sentences, config);
        engine.set_seed(7);
        engine
    }

    fn right_answer(engine: &Engine, card: &Card) -> String {
        match card {
            Card::Word {
                item, direction, ..
            } => match direction {
                Direction::SourceToTarget => item.target_text.clone(),
                Direction::TargetToSource => item.source_text.clone(),
            },
            Card::Sentence { sentence_id, .. } => engine.sentences()[*sentence_id].target_text.clone(),
        }
    }

    fn answer(engine: &mut Engine, correct: bool) -> AnswerOutcome {
        let card = engine.current_card().cloned().expect("card");
        let typed = if correct {
            right_answer(engine, &card)
        } else {
            "definitely wrong".to_string()
        };
        engine.submit_answer(&typed, NOW).unwrap()
    }

    /// Runs sessions of `kind` answering everything correctly until `done`
    fn drill(engine: &mut Engine, kind: SessionKind, mode: DirectionMode, done: impl Fn(&Engine) -> bool) {
        for _ in 0..1000 {
            if done(engine) {
                return;
            }
            if engine.current_card().is_none() {
                engine.start_session(kind, mode, NOW).unwrap();
            }
            answer(engine, true);
        }
        panic!("drill did not converge");
    }

    fn graduate_all_active(engine: &mut Engine, count: usize) {
        let target = engine.decks().graduated().len() + count;
        drill(engine, SessionKind::Active, DirectionMode::Mixed, |e| {
            e.decks().graduated().len() >= target
        });
    }

    #[test]
    fn test_new_engine_partitions_pool() {
        let engine = engine(words(100), Vec::new(), EngineConfig::default());
        assert_eq!(engine.decks().active().len(), 80);
        assert_eq!(engine.decks().reserve().len(), 20);
        assert_eq!(engine.mastery().records().len(), 100);
        assert_eq!(engine.gate_state(), GateState::Unlocked);
    }

    #[test]
    fn test_correct_then_incorrect_nets_zero() {
        let mut engine = engine(words(2), Vec::new(), config(5, 1, 50, 100));
        engine
            .start_session(SessionKind::Active, DirectionMode::SourceToTarget, NOW)
            .unwrap();
        let outcome = answer(&mut engine, true);
        assert_eq!(outcome.mastery, Some(MasteryRecord::new(1, 0)));
        assert_eq!(outcome.streaks.current, 1);
        assert!(outcome.session_finished());

        engine
            .start_session(SessionKind::Active, DirectionMode::SourceToTarget, NOW)
            .unwrap();
        let outcome = answer(&mut engine, false);
        assert_eq!(outcome.mastery, Some(MasteryRecord::new(0, 0)));
        assert_eq!(outcome.streaks.current, 0);
        assert_eq!(outcome.streaks.best, 1);
        assert_eq!(outcome.expected, "t0");
        // the missed card goes back into the pool
        assert!(matches!(outcome.next_card, Some(Card::Word { ref item, .. }) if item.id == 0));
    }

    #[test]
    fn test_answers_update_srs() {
        let mut engine = engine(words(3), Vec::new(), EngineConfig::default());
        engine
            .start_session(SessionKind::Active, DirectionMode::Mixed, NOW)
            .unwrap();
        let card = engine.current_card().cloned().unwrap();
        answer(&mut engine, true);
        let Card::Word { item, .. } = card else { panic!("word card") };
        let srs = engine.srs().get(&item.source_text).unwrap();
        assert_eq!(srs.last_review_ms, Some(NOW));
        assert_eq!(srs.interval_days, 1);
    }

    #[test]
    fn test_mastery_promotes_and_introduces() {
        let mut engine = engine(words(3), Vec::new(), config(1, 2, 50, 100));
        engine
            .start_session(SessionKind::Active, DirectionMode::SourceToTarget, NOW)
            .unwrap();
        answer(&mut engine, true);
        answer(&mut engine, true);
        assert!(engine.decks().graduated().is_empty());

        engine
            .start_session(SessionKind::Active, DirectionMode::TargetToSource, NOW)
            .unwrap();
        let outcome = answer(&mut engine, true);
        let promotion = outcome.promotion.clone().expect("promotion");
        assert_eq!(outcome.introduced().map(|i| i.id), Some(2));
        assert_eq!(engine.decks().graduated(), &[promotion.graduated.clone()]);
        assert_eq!(engine.decks().active().len(), 2);
        assert!(engine.decks().reserve().is_empty());
    }

    #[test]
    fn test_graduated_items_do_not_promote_twice() {
        let mut engine = engine(words(2), Vec::new(), config(1, 2, 50, 100));
        graduate_all_active(&mut engine, 2);
        engine
            .start_session(SessionKind::Graduated, DirectionMode::Mixed, NOW)
            .unwrap();
        let outcome = answer(&mut engine, true);
        assert!(outcome.promotion.is_none());
        assert_eq!(engine.decks().graduated().len(), 2);
    }

    #[test]
    fn test_lock_and_unlock_cycle() {
        let mut engine = engine(words(10), Vec::new(), config(1, 4, 2, 3));
        graduate_all_active(&mut engine, 2);
        engine.end_session(NOW);
        assert_eq!(engine.gate_state(), GateState::Locked);
        assert_eq!(
            engine.start_session(SessionKind::Active, DirectionMode::Mixed, NOW),
            Err(SessionRejection::Locked { unlock_streak_required: 3 })
        );

        engine
            .start_session(SessionKind::Graduated, DirectionMode::Mixed, NOW)
            .unwrap();
        assert_eq!(answer(&mut engine, true).streaks.unlock, 1);
        // a miss in graduated practice resets the unlock streak
        let outcome = answer(&mut engine, false);
        assert_eq!(outcome.streaks.unlock, 0);
        assert!(outcome.session_finished());

        let mut unlocked = false;
        for _ in 0..3 {
            if engine.current_card().is_none() {
                engine
                    .start_session(SessionKind::Graduated, DirectionMode::Mixed, NOW)
                    .unwrap();
            }
            let outcome = answer(&mut engine, true);
            unlocked = outcome.unlocked;
        }
        assert!(unlocked);
        assert_eq!(engine.gate_state(), GateState::Unlocked);
        assert_eq!(engine.streaks().unlock, 0);
        assert_eq!(engine.decks().graduated().len(), 2);

        // the override survives until the next promotion, then the next milestone relocks
        graduate_all_active(&mut engine, 1);
        assert_eq!(engine.gate_state(), GateState::Unlocked);
        assert!(!engine.snapshot(NOW).gate_override);
        graduate_all_active(&mut engine, 1);
        assert_eq!(engine.decks().graduated().len(), 4);
        assert_eq!(engine.gate_state(), GateState::Locked);
    }

    #[test]
    fn test_unlock_streak_only_counts_while_locked() {
        let mut engine = engine(words(6), Vec::new(), config(1, 3, 50, 100));
        graduate_all_active(&mut engine, 1);
        engine
            .start_session(SessionKind::Graduated, DirectionMode::Mixed, NOW)
            .unwrap();
        let outcome = answer(&mut engine, true);
        assert_eq!(outcome.streaks.unlock, 0);
        assert_eq!(outcome.streaks.current, engine.streaks().current);
    }

    #[test]
    fn test_sentence_session() {
        let sentences = vec![
            Sentence { source_text: "w0 w1.".into(), target_text: "Zero one".into() },
            Sentence { source_text: "w0 zzz".into(), target_text: "zero nothing".into() },
        ];
        let mut engine = engine(words(10), sentences, config(1, 3, 50, 100));
        assert_eq!(
            engine.start_session(SessionKind::Sentence, DirectionMode::Mixed, NOW),
            Err(SessionRejection::NoEligibleSentences)
        );

        drill(&mut engine, SessionKind::Active, DirectionMode::Mixed, |e| {
            e.decks().is_graduated("w0") && e.decks().is_graduated("w1")
        });
        assert_eq!(engine.eligible_sentences(), vec![0]);

        let card = engine
            .start_session(SessionKind::Sentence, DirectionMode::Mixed, NOW)
            .unwrap();
        assert_eq!(card.prompt(), "w0 w1.");
        let best_before = engine.streaks().best;
        let outcome = engine.submit_answer("zero, one!", NOW).unwrap();
        assert!(outcome.correct);
        assert_eq!(outcome.sentence_count, Some(1));
        assert!(outcome.session_finished());
        assert!(engine.streaks().best >= best_before);
        assert_eq!(engine.progress().completed_sentences, 1);
        assert_eq!(engine.progress().mastered_sentences, 1);

        engine
            .start_session(SessionKind::Sentence, DirectionMode::Mixed, NOW)
            .unwrap();
        let outcome = engine.submit_answer("nope", NOW).unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.sentence_count, Some(1));
        assert_eq!(outcome.streaks.current, 0);
    }

    #[test]
    fn test_empty_decks_reject_sessions() {
        let mut engine = engine(Vec::new(), Vec::new(), EngineConfig::default());
        assert_eq!(
            engine.start_session(SessionKind::Active, DirectionMode::Mixed, NOW),
            Err(SessionRejection::EmptyDeck)
        );
        assert_eq!(
            engine.start_session(SessionKind::Graduated, DirectionMode::Mixed, NOW),
            Err(SessionRejection::EmptyDeck)
        );
    }

    #[test]
    fn test_submit_without_session() {
        let mut engine = engine(words(3), Vec::new(), EngineConfig::default());
        assert_eq!(engine.submit_answer("x", NOW), Err(EngineError::NoSession));
    }

    #[test]
    fn test_starting_a_session_discards_the_previous_one() {
        let mut engine = engine(words(5), Vec::new(), config(1, 5, 50, 100));
        engine
            .start_session(SessionKind::Active, DirectionMode::Mixed, NOW)
            .unwrap();
        answer(&mut engine, false);
        engine
            .start_session(SessionKind::Active, DirectionMode::Mixed, NOW + 5_000)
            .unwrap();
        let stats = engine.session_stats(NOW + 65_000).unwrap();
        assert_eq!(stats.cards_remaining, 4);
        assert_eq!(stats.cards_completed, 0);
        assert_eq!(stats.elapsed_seconds, 60);
    }

    #[test]
    fn test_snapshot_round_trip_through_json() {
        let mut engine = engine(words(20), Vec::new(), config(1, 5, 50, 100));
        graduate_all_active(&mut engine, 3);
        engine
            .start_session(SessionKind::Active, DirectionMode::Mixed, NOW)
            .unwrap();
        answer(&mut engine, false);

        let snapshot = engine.snapshot(NOW);
        let raw = snapshot.to_json().unwrap();
        let restored = Engine::restore(
            words(20),
            Vec::new(),
            config(1, 5, 50, 100),
            Snapshot::from_json(&raw, 1).unwrap(),
        );

        assert_eq!(restored.decks(), engine.decks());
        assert_eq!(restored.mastery().records(), engine.mastery().records());
        assert_eq!(restored.streaks(), engine.streaks());
        assert_eq!(restored.revision(), engine.revision());
        assert!(restored.current_card().is_none());
    }

    #[test]
    fn test_resume_revision_from_only_moves_forward() {
        let mut engine = engine(words(5), Vec::new(), config(1, 3, 50, 100));
        engine.resume_revision_from(40);
        assert_eq!(engine.revision(), 40);
        engine.resume_revision_from(7);
        assert_eq!(engine.revision(), 40);

        engine
            .start_session(SessionKind::Active, DirectionMode::SourceToTarget, NOW)
            .unwrap();
        answer(&mut engine, true);
        assert_eq!(engine.snapshot(NOW).revision, 41);
    }

    #[test]
    fn test_restore_from_legacy_snapshot() {
        let raw = r#"{
            "openDeck": [{"id": 1, "spanish": "w1", "english": "t1"}],
            "completeDeck": [{"id": 0, "spanish": "w0", "english": "t0"}],
            "mastery": {"w0": 9, "w1": {"s2e": 1, "e2s": 0}},
            "streak": 2,
            "bestStreak": 4
        }"#;
        let snapshot = Snapshot::from_json(raw, 5).unwrap();
        let engine = Engine::restore(words(5), Vec::new(), config(5, 3, 50, 100), snapshot);
        assert_eq!(engine.decks().graduated().len(), 1);
        // active is topped back up to three from the reserve
        let active: Vec<u32> = engine.decks().active().iter().map(|i| i.id).collect();
        assert_eq!(active, vec![1, 2, 3]);
        assert_eq!(engine.mastery().get("w0"), MasteryRecord::new(5, 5));
        assert_eq!(engine.streaks().best, 4);
    }

    #[test]
    fn test_item_detail() {
        let engine = engine(words(3), Vec::new(), config(5, 2, 50, 100));
        let detail = engine.item_detail("w2", NOW).unwrap();
        assert_eq!(detail.placement, Placement::Reserve);
        assert_eq!(detail.weakness, 10);
        assert!(detail.due);
        assert!(engine.item_detail("missing", NOW).is_none());
    }

    #[test]
    fn test_active_deck_size_invariant() {
        let mut engine = engine(words(90), Vec::new(), config(1, 80, 1000, 100));
        graduate_all_active(&mut engine, 10);
        assert_eq!(engine.decks().active().len(), 80);
        assert!(engine.decks().reserve().is_empty());

        graduate_all_active(&mut engine, 5);
        let decks = engine.decks();
        assert_eq!(decks.active().len(), 75);
        assert_eq!(decks.active().len() + decks.graduated().len(), 90);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_partitions_stay_disjoint_and_exhaustive(
            seed in any::<u64>(),
            answers in prop::collection::vec(any::<bool>(), 1..400),
        ) {
            let pool = words(12);
            let mut engine = Engine::new(pool.clone(), Vec::new(), config(1, 4, 5, 3));
            engine.set_seed(seed);
            let mut graduated_seen: Vec<String> = Vec::new();

            for correct in answers {
                if engine.current_card().is_none() {
                    let kind = if engine.gate_state().is_locked() {
                        SessionKind::Graduated
                    } else {
                        SessionKind::Active
                    };
                    if engine.start_session(kind, DirectionMode::Mixed, NOW).is_err() {
                        break;
                    }
                }
                let card = engine.current_card().cloned().unwrap();
                let typed = if correct { right_answer(&engine, &card) } else { "x".to_string() };
                let outcome = engine.submit_answer(&typed, NOW).unwrap();

                if let Some(promotion) = &outcome.promotion {
                    let key = &promotion.graduated.source_text;
                    prop_assert!(!graduated_seen.contains(key));
                    prop_assert!(engine.mastery().is_mastered(key));
                    graduated_seen.push(key.clone());
                }

                let decks = engine.decks();
                let mut keys = HashSet::new();
                for item in decks.reserve().iter().chain(decks.active()).chain(decks.graduated()) {
                    prop_assert!(keys.insert(item.source_text.clone()));
                }
                prop_assert_eq!(keys.len(), pool.len());
                if !decks.reserve().is_empty() {
                    prop_assert_eq!(decks.active().len(), 4);
                }
                for record in engine.mastery().records().values() {
                    prop_assert!(record.source_to_target <= 1 && record.target_to_source <= 1);
                }
            }
        }
    }
}
