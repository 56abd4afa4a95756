//! Answer streaks

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    pub current: u32,
    pub best: u32,
    pub unlock: u32,
}

impl StreakState {
    /// `best` can never trail `current`
    pub fn sanitized(mut self) -> Self {
        self.best = self.best.max(self.current);
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreakController {
    state: StreakState,
}

impl StreakController {
    pub fn from_state(state: StreakState) -> Self {
        Self {
            state: state.sanitized(),
        }
    }

    pub fn state(&self) -> StreakState {
        self.state
    }

    /// Applies one answer.
    ///
    /// `counts_toward_unlock` is true for graduated-deck answers given while
    /// the gate is locked; `resets_unlock` is true for any graduated-deck
    /// answer.
    pub fn record(&mut self, correct: bool, counts_toward_unlock: bool, resets_unlock: bool) -> StreakState {
        if correct {
            self.state.current = self.state.current.saturating_add(1);
            self.state.best = self.state.best.max(self.state.current);
            if counts_toward_unlock {
                self.state.unlock = self.state.unlock.saturating_add(1);
            }
        } else {
            self.state.current = 0;
            if resets_unlock {
                self.state.unlock = 0;
            }
        }
        self.state
    }

    pub fn reset_unlock(&mut self) {
        self.state.unlock = 0;
    }
}
