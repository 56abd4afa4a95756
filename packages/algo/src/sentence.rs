//! Sentence unlocking and sentence practice counters
//!
//! A sentence becomes practicable once every word in it has graduated.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::sanitize::{normalize, sentence_tokens};
use crate::types::{Item, Sentence, SentenceId};

/// Checks sentences against a fixed set of graduated words
pub struct SentenceUnlockChecker {
    graduated: HashSet<String>,
}

impl SentenceUnlockChecker {
    pub fn new(graduated: &[Item]) -> Self {
        Self {
            graduated: graduated
                .iter()
                .map(|item| normalize(&item.source_text))
                .collect(),
        }
    }

    /// Sentences without any word are never eligible
    pub fn is_eligible(&self, sentence: &Sentence) -> bool {
        let tokens = sentence_tokens(&sentence.source_text);
        !tokens.is_empty()
            && tokens
                .iter()
                .all(|token| self.graduated.contains(&normalize(token)))
    }

    pub fn eligible_ids(&self, sentences: &[Sentence]) -> Vec<SentenceId> {
        sentences
            .iter()
            .enumerate()
            .filter(|(_, sentence)| self.is_eligible(sentence))
            .map(|(id, _)| id)
            .collect()
    }
}

/// Correct-answer counts per sentence plus the set answered correctly once
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SentenceProgress {
    mastery: BTreeMap<SentenceId, u32>,
    completed: BTreeSet<SentenceId>,
}

impl SentenceProgress {
    pub fn from_parts(mastery: BTreeMap<SentenceId, u32>, completed: BTreeSet<SentenceId>) -> Self {
        Self { mastery, completed }
    }

    pub fn mastery(&self) -> &BTreeMap<SentenceId, u32> {
        &self.mastery
    }

    pub fn completed(&self) -> &BTreeSet<SentenceId> {
        &self.completed
    }

    pub fn count(&self, id: SentenceId) -> u32 {
        self.mastery.get(&id).copied().unwrap_or(0)
    }

    pub fn record_correct(&mut self, id: SentenceId) -> u32 {
        self.completed.insert(id);
        let count = self.mastery.entry(id).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// Sentences answered correctly at least `required` times
    pub fn mastered_count(&self, required: u32) -> usize {
        self.mastery.values().filter(|count| **count >= required).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(source: &str) -> Sentence {
        Sentence {
            source_text: source.to_string(),
            target_text: String::new(),
        }
    }

    fn graduated(words: &[&str]) -> Vec<Item> {
        words
            .iter()
            .enumerate()
            .map(|(i, w)| Item::new(i as u32, *w, "x"))
            .collect()
    }

    #[test]
    fn test_eligible_when_all_words_graduated() {
        let checker = SentenceUnlockChecker::new(&graduated(&["el", "gato", "está", "aquí"]));
        assert!(checker.is_eligible(&sentence("¿El gato está aquí?")));
        assert!(checker.is_eligible(&sentence("el GATO esta aqui.")));
        assert!(!checker.is_eligible(&sentence("El perro está aquí.")));
    }

    #[test]
    fn test_empty_sentence_is_not_eligible() {
        let checker = SentenceUnlockChecker::new(&graduated(&["hola"]));
        assert!(!checker.is_eligible(&sentence("¡!")));
    }

    #[test]
    fn test_eligible_ids_keep_source_order() {
        let sentences = vec![sentence("hola"), sentence("adiós amigo"), sentence("hola amigo")];
        let checker = SentenceUnlockChecker::new(&graduated(&["hola", "amigo"]));
        assert_eq!(checker.eligible_ids(&sentences), vec![0, 2]);
    }

    #[test]
    fn test_sentence_progress_counts() {
        let mut progress = SentenceProgress::default();
        assert_eq!(progress.record_correct(3), 1);
        assert_eq!(progress.record_correct(3), 2);
        progress.record_correct(1);
        assert_eq!(progress.count(3), 2);
        assert!(progress.completed().contains(&1));
        assert_eq!(progress.mastered_count(2), 1);
        assert_eq!(progress.mastered_count(1), 2);
    }
}
