//! Streak-gated lock on active-deck practice
//!
//! The gate is derived from the graduated deck size on every query. An
//! unlock sets an override that keeps the gate open until the next
//! promotion, otherwise the milestone rule would relock it immediately.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GateState {
    Unlocked,
    Locked,
}

impl GateState {
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockGate {
    milestone: usize,
    override_active: bool,
}

impl LockGate {
    pub fn new(milestone: usize) -> Self {
        Self {
            milestone: milestone.max(1),
            override_active: false,
        }
    }

    pub fn with_override(milestone: usize, override_active: bool) -> Self {
        Self {
            override_active,
            ..Self::new(milestone)
        }
    }

    /// True when `graduated_len` is a positive multiple of the milestone
    pub fn milestone_hit(&self, graduated_len: usize) -> bool {
        graduated_len > 0 && graduated_len % self.milestone == 0
    }

    pub fn state(&self, graduated_len: usize) -> GateState {
        if self.milestone_hit(graduated_len) && !self.override_active {
            GateState::Locked
        } else {
            GateState::Unlocked
        }
    }

    pub fn override_active(&self) -> bool {
        self.override_active
    }

    /// Opens the gate until the next promotion
    pub fn unlock(&mut self) {
        self.override_active = true;
    }

    pub fn on_promotion(&mut self) {
        self.override_active = false;
    }
}
