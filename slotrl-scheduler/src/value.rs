//! Per-slot action-value table and its Bellman-style update

use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use slotrl_core::{Reward, SlotIndex};

/// Q-learning constants
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QLearningParams {
    /// Learning rate, in `(0, 1)`
    pub alpha: f64,
    /// Discount factor, in `(0, 1)`
    pub gamma: f64,
    /// Constant added to the bootstrapped maximum when forming the update
    /// target; configured equal to the success reward magnitude
    ///
    /// This biases the target upward instead of using the raw maximum.
    /// It is non-standard Q-learning, preserved as observable behavior of
    /// the deployed algorithm rather than silently corrected.
    pub success_bonus: f64,
}

impl Default for QLearningParams {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.95,
            success_bonus: 1.0,
        }
    }
}

/// One scalar value estimate per slot in the unicast cycle
///
/// Mutated only by [`update`](ValueTable::update); read by action
/// selection. Lives for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueTable {
    values: Array1<f64>,
}

impl ValueTable {
    /// Table of `n` slots, all estimates at zero
    #[must_use]
    pub fn zeros(n: usize) -> Self {
        Self {
            values: Array1::zeros(n),
        }
    }

    /// Table of `n` slots with independent uniform `[0, 1)` estimates
    pub fn random<R: Rng>(n: usize, rng: &mut R) -> Self {
        Self {
            values: Array1::from_iter((0..n).map(|_| rng.gen::<f64>())),
        }
    }

    /// Number of slots
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value estimate for a slot
    #[must_use]
    pub fn get(&self, slot: SlotIndex) -> f64 {
        self.values[slot.0]
    }

    /// Slot with the highest value estimate, ties broken by lowest index
    #[must_use]
    pub fn best_slot(&self) -> SlotIndex {
        let mut best = 0;
        for (i, &v) in self.values.iter().enumerate().skip(1) {
            if v > self.values[best] {
                best = i;
            }
        }
        SlotIndex(best)
    }

    /// Apply the off-policy one-step update for `action`
    ///
    /// ```text
    /// target = V[best] + success_bonus
    /// V[a]   = (1 - alpha) * V[a] + alpha * (r + gamma * target - V[a])
    /// ```
    ///
    /// If the written estimate comes out non-finite it is reset to zero so
    /// a single bad sample cannot corrupt subsequent argmax selection.
    pub fn update(&mut self, action: SlotIndex, reward: Reward, params: &QLearningParams) {
        let best = self.best_slot();
        let target = self.values[best.0] + params.success_bonus;
        let old = self.values[action.0];
        let new = (1.0 - params.alpha) * old
            + params.alpha * (reward.value() + params.gamma * target - old);

        if new.is_finite() {
            self.values[action.0] = new;
        } else {
            warn!(slot = action.0, "non-finite value estimate, resetting to zero");
            self.values[action.0] = 0.0;
        }
    }

    /// Copy of the table for telemetry
    #[must_use]
    pub fn snapshot(&self) -> Vec<f64> {
        self.values.to_vec()
    }
}
