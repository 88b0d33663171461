//! Epsilon-greedy exploration with a cycle-count decay schedule

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Exploration schedule constants
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExplorationParams {
    /// Ceiling on the exploration probability, in `(0, 1]`
    pub epsilon_fixed: f64,
    /// Decay horizon: epsilon follows `K / cycle` once that falls below
    /// the ceiling
    pub horizon_k: f64,
}

impl Default for ExplorationParams {
    fn default() -> Self {
        Self {
            epsilon_fixed: 0.5,
            horizon_k: 10_000.0,
        }
    }
}

/// Decides explore vs. exploit for the current cycle
#[derive(Debug, Clone, Copy)]
pub struct ExplorationPolicy {
    params: ExplorationParams,
}

impl ExplorationPolicy {
    /// Create a policy with the given schedule
    #[must_use]
    pub fn new(params: ExplorationParams) -> Self {
        Self { params }
    }

    /// Exploration probability at `cycle`: `min(epsilon_fixed, K / cycle)`
    ///
    /// Cycle 0 is treated as cycle 1 to avoid the division by zero.
    #[must_use]
    pub fn epsilon(&self, cycle: u64) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let cycle = cycle.max(1) as f64;
        (self.params.horizon_k / cycle).min(self.params.epsilon_fixed)
    }

    /// Draw the explore/exploit decision for `cycle`
    pub fn should_explore<R: Rng>(&self, cycle: u64, rng: &mut R) -> bool {
        rng.gen::<f64>() < self.epsilon(cycle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn policy() -> ExplorationPolicy {
        ExplorationPolicy::new(ExplorationParams {
            epsilon_fixed: 0.5,
            horizon_k: 10_000.0,
        })
    }

    #[test]
    fn cycle_zero_is_guarded() {
        let p = policy();
        assert_relative_eq!(p.epsilon(0), p.epsilon(1));
    }

    #[test]
    fn epsilon_is_capped_early_and_decays_late() {
        let p = policy();
        // Early on K / cycle is huge, so the ceiling applies
        assert_relative_eq!(p.epsilon(1), 0.5);
        assert_relative_eq!(p.epsilon(10_000), 0.5);
        // Past the horizon the 1/cycle decay takes over
        assert_relative_eq!(p.epsilon(40_000), 0.25);
        assert_relative_eq!(p.epsilon(100_000), 0.1);
    }

    #[test]
    fn epsilon_never_increases_with_cycle() {
        let p = policy();
        let mut last = p.epsilon(1);
        for cycle in (1..200_000).step_by(997) {
            let eps = p.epsilon(cycle);
            assert!(eps <= last);
            last = eps;
        }
    }

    #[test]
    fn certain_exploration_when_epsilon_is_one() {
        let p = ExplorationPolicy::new(ExplorationParams {
            epsilon_fixed: 1.0,
            horizon_k: 10_000.0,
        });
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            assert!(p.should_explore(1, &mut rng));
        }
    }

    #[test]
    fn explore_frequency_tracks_epsilon() {
        let p = policy();
        let mut rng = rand::thread_rng();
        let trials = 20_000;
        let hits = (0..trials).filter(|_| p.should_explore(5, &mut rng)).count();
        #[allow(clippy::cast_precision_loss)]
        let freq = hits as f64 / f64::from(trials);
        assert!((freq - 0.5).abs() < 0.02);
    }
}
