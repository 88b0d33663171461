//! Decaying per-slot contention estimates

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use slotrl_core::SlotIndex;

/// One decaying occupancy estimate per slot: how much traffic pressure
/// has recently been observed on that slot
///
/// Decayed once per completed cycle; never reset outside an explicit
/// [`reset`](OccupancyTable::reset). Exploration steers toward the slot
/// with the smallest estimate, i.e. the one believed least contended by
/// other nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupancyTable {
    estimates: Array1<f64>,
}

impl OccupancyTable {
    /// Table of `n` slots, all estimates at zero
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            estimates: Array1::zeros(n),
        }
    }

    /// Number of slots
    #[must_use]
    pub fn len(&self) -> usize {
        self.estimates.len()
    }

    /// Whether the table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }

    /// Estimate for a slot
    #[must_use]
    pub fn get(&self, slot: SlotIndex) -> f64 {
        self.estimates[slot.0]
    }

    /// Fold one cycle's observed activity into the estimates
    ///
    /// `O[i] = factor * O[i] + (1 - factor) * activity[i]`, with `factor`
    /// in `(0, 1)`. Slots beyond the activity slice (or all slots, when no
    /// signal is exposed) observe zero, degrading to exponential decay
    /// toward zero.
    pub fn decay(&mut self, factor: f64, activity: &[f64]) {
        for (i, estimate) in self.estimates.iter_mut().enumerate() {
            let observed = activity.get(i).copied().unwrap_or(0.0);
            *estimate = factor * *estimate + (1.0 - factor) * observed;
        }
    }

    /// Slot with the smallest estimate, ties broken by lowest index
    #[must_use]
    pub fn min_slot(&self) -> SlotIndex {
        let mut min = 0;
        for (i, &v) in self.estimates.iter().enumerate().skip(1) {
            if v < self.estimates[min] {
                min = i;
            }
        }
        SlotIndex(min)
    }

    /// Zero every estimate
    pub fn reset(&mut self) {
        self.estimates.fill(0.0);
    }

    /// Copy of the table for telemetry
    #[must_use]
    pub fn snapshot(&self) -> Vec<f64> {
        self.estimates.to_vec()
    }
}
