//! Reward signals and outcome-to-reward mapping

use serde::{Deserialize, Serialize};

use crate::outcome::TransmissionOutcome;

/// Scalar reward derived from a transmission outcome
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Reward(pub f64);

impl Reward {
    /// Create a new reward
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the reward value
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for Reward {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<Reward> for f64 {
    fn from(reward: Reward) -> Self {
        reward.0
    }
}

/// Reward constants for the two observable transmission outcomes
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OutcomeRewards {
    /// Reward for an acknowledged transmission (positive)
    pub success: f64,
    /// Reward for an unacknowledged transmission (zero or negative)
    pub failure: f64,
}

impl Default for OutcomeRewards {
    fn default() -> Self {
        Self {
            success: 1.0,
            failure: -1.0,
        }
    }
}

impl OutcomeRewards {
    /// Map an outcome to its reward
    ///
    /// `NoAttempt` yields `None`: the value table is left untouched for a
    /// cycle in which nothing was offered on the TX slot.
    #[must_use]
    pub fn reward(&self, outcome: TransmissionOutcome) -> Option<Reward> {
        match outcome {
            TransmissionOutcome::Success => Some(Reward(self.success)),
            TransmissionOutcome::Failure => Some(Reward(self.failure)),
            TransmissionOutcome::NoAttempt => None,
        }
    }
}
