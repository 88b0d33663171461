//! Slot model for the repeating unicast cycle

use serde::{Deserialize, Serialize};

/// Index of one schedulable slot within the unicast cycle, in `[0, N)`
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SlotIndex(pub usize);

impl SlotIndex {
    /// Get the raw index
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role a slot plays for this node within the cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotRole {
    /// The node's exclusive transmit slot; exactly one at any time
    TxExclusive,
    /// A shared receive/listen slot
    RxShared,
}

/// The discrete space of slots in the unicast cycle
///
/// Cycle length is fixed at startup and immutable thereafter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SlotSpace {
    /// Number of slots in the cycle
    pub len: usize,
}

impl SlotSpace {
    /// Create a slot space over a cycle of `len` slots
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self { len }
    }

    /// Sample a uniformly random slot from the cycle
    pub fn sample<R: rand::Rng>(&self, rng: &mut R) -> SlotIndex {
        SlotIndex(rng.gen_range(0..self.len))
    }

    /// Check that a slot index lies within the cycle
    #[must_use]
    pub fn contains(&self, slot: SlotIndex) -> bool {
        slot.0 < self.len
    }

    /// Validate a slot index, returning it on success
    pub fn validate(&self, slot: SlotIndex) -> crate::Result<SlotIndex> {
        if self.contains(slot) {
            Ok(slot)
        } else {
            Err(crate::SchedulerError::InvalidSlot {
                slot,
                len: self.len,
            })
        }
    }
}
