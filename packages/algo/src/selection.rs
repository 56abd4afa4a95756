//! Next-card selection policies
//!
//! - **Weighted without replacement**: active-deck practice. Each candidate
//!   weighs `max(1, 1 + 2 * weakness)`, so weak items come up more often but
//!   strong ones are never excluded.
//! - **Uniform without replacement**: graduated-deck and sentence practice.
//!   The pool is shuffled once and served from the end.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::{Direction, DirectionMode, Item};

/// Sampling weight of an item with the given weakness
pub fn selection_weight(weakness: u32) -> u64 {
    (1 + 2 * weakness as u64).max(1)
}

/// Picks an index with probability proportional to its weight.
///
/// Draws `u` uniformly from `[0, total)` and returns the first index whose
/// running weight total exceeds `u`. Returns `None` for an empty or
/// all-zero slice.
pub fn weighted_index<R: Rng>(weights: &[u64], rng: &mut R) -> Option<usize> {
    let total: u64 = weights.iter().sum();
    if total == 0 {
        return None;
    }
    let draw = rng.gen_range(0..total);
    let mut running = 0u64;
    for (idx, weight) in weights.iter().enumerate() {
        running += weight;
        if running > draw {
            return Some(idx);
        }
    }
    Some(weights.len() - 1)
}

/// Resolves the direction of a single card
pub fn resolve_direction<R: Rng>(mode: DirectionMode, rng: &mut R) -> Direction {
    match mode {
        DirectionMode::SourceToTarget => Direction::SourceToTarget,
        DirectionMode::TargetToSource => Direction::TargetToSource,
        DirectionMode::Mixed => {
            if rng.gen_bool(0.5) {
                Direction::SourceToTarget
            } else {
                Direction::TargetToSource
            }
        }
    }
}

/// Weakness-weighted pool used for active-deck sessions
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WeightedPool {
    items: Vec<Item>,
}

impl WeightedPool {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Removes and returns one item, weighting by the live weakness of each
    pub fn draw<R, F>(&mut self, weakness: F, rng: &mut R) -> Option<Item>
    where
        R: Rng,
        F: Fn(&Item) -> u32,
    {
        let weights: Vec<u64> = self
            .items
            .iter()
            .map(|item| selection_weight(weakness(item)))
            .collect();
        let idx = weighted_index(&weights, rng)?;
        Some(self.items.remove(idx))
    }

    /// Returns a missed item to the pool and reshuffles it
    pub fn put_back<R: Rng>(&mut self, item: Item, rng: &mut R) {
        self.items.push(item);
        self.items.shuffle(rng);
    }
}

/// Shuffled pool served from the end
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UniformPool<T> {
    items: Vec<T>,
}

impl<T> UniformPool<T> {
    pub fn shuffled<R: Rng>(mut items: Vec<T>, rng: &mut R) -> Self {
        items.shuffle(rng);
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn draw(&mut self) -> Option<T> {
        self.items.pop()
    }
}
