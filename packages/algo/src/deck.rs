//! Deck pipeline: reserve queue → active deck → graduated deck
//!
//! The three collections partition the word pool. Items move only through
//! [`DeckManager::promote`], which graduates a mastered active item and
//! refills the active deck from the head of the reserve.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::types::Item;

/// Result of a successful promotion
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub graduated: Item,
    /// Item moved from the reserve into the active deck, if any remained
    pub introduced: Option<Item>,
}

/// Where an item currently lives
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Placement {
    Reserve,
    Active,
    Graduated,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeckManager {
    reserve: VecDeque<Item>,
    active: Vec<Item>,
    graduated: Vec<Item>,
}

impl DeckManager {
    /// Splits a frequency-ordered pool into active and reserve
    pub fn initialize(pool: &[Item], active_size: usize) -> Self {
        let split = active_size.min(pool.len());
        Self {
            active: pool[..split].to_vec(),
            reserve: pool[split..].iter().cloned().collect(),
            graduated: Vec::new(),
        }
    }

    /// Rebuilds decks from saved active/graduated lists.
    ///
    /// Graduated wins over active when an item appears in both, and the
    /// reserve becomes every remaining pool item in pool order.
    pub fn restore(pool: &[Item], active: Vec<Item>, graduated: Vec<Item>) -> Self {
        let mut seen: HashSet<String> = HashSet::new();

        let graduated: Vec<Item> = graduated
            .into_iter()
            .filter(|item| seen.insert(item.source_text.clone()))
            .collect();
        let active: Vec<Item> = active
            .into_iter()
            .filter(|item| seen.insert(item.source_text.clone()))
            .collect();
        let reserve: VecDeque<Item> = pool
            .iter()
            .filter(|item| seen.insert(item.source_text.clone()))
            .cloned()
            .collect();

        Self {
            reserve,
            active,
            graduated,
        }
    }

    pub fn reserve(&self) -> &VecDeque<Item> {
        &self.reserve
    }

    pub fn active(&self) -> &[Item] {
        &self.active
    }

    pub fn graduated(&self) -> &[Item] {
        &self.graduated
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.active.iter().any(|item| item.source_text == key)
    }

    pub fn is_graduated(&self, key: &str) -> bool {
        self.graduated.iter().any(|item| item.source_text == key)
    }

    pub fn placement(&self, key: &str) -> Option<Placement> {
        if self.is_graduated(key) {
            Some(Placement::Graduated)
        } else if self.is_active(key) {
            Some(Placement::Active)
        } else if self.reserve.iter().any(|item| item.source_text == key) {
            Some(Placement::Reserve)
        } else {
            None
        }
    }

    pub fn find(&self, key: &str) -> Option<&Item> {
        self.active
            .iter()
            .chain(self.graduated.iter())
            .chain(self.reserve.iter())
            .find(|item| item.source_text == key)
    }

    /// Tops the active deck up to `active_size` from the reserve head
    pub fn refill(&mut self, active_size: usize) -> Vec<Item> {
        let mut introduced = Vec::new();
        while self.active.len() < active_size {
            let Some(item) = self.reserve.pop_front() else {
                break;
            };
            self.active.push(item.clone());
            introduced.push(item);
        }
        introduced
    }

    /// Graduates an active item; the caller checks mastery first.
    ///
    /// Returns `None` without touching anything when the item is already
    /// graduated or not in the active deck.
    pub fn promote(&mut self, key: &str) -> Option<Promotion> {
        if self.is_graduated(key) {
            return None;
        }
        let idx = self.active.iter().position(|item| item.source_text == key)?;
        let graduated = self.active.remove(idx);
        self.graduated.push(graduated.clone());

        let introduced = self.reserve.pop_front();
        if let Some(item) = &introduced {
            self.active.push(item.clone());
        }

        Some(Promotion {
            graduated,
            introduced,
        })
    }
}
