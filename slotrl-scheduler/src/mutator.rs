//! Live mutation of the node's exclusive TX slot

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use slotrl_core::{SchedulerError, SlotIndex, SlotMap, SlotRole, SlotSpace};

/// What a call to [`ScheduleMutator::apply`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The TX assignment moved to the requested slot
    Applied,
    /// The requested slot was already the TX slot; nothing was touched
    Unchanged,
    /// The exclusion primitive was contended within the bounded wait;
    /// the mutation is deferred to the next cycle
    Deferred,
}

/// Applies a chosen slot as the node's exclusive TX slot against the
/// external slot map, reverting the previous one
///
/// Mutation runs strictly inside the slot map's pause window so it can
/// never interleave with in-flight slot execution. The previous
/// assignment is committed as superseded only after both role changes
/// succeed and the map has resumed.
pub struct ScheduleMutator {
    map: Arc<dyn SlotMap>,
    space: SlotSpace,
    lock_timeout: Duration,
    current: SlotIndex,
}

impl ScheduleMutator {
    /// Wrap a slot map whose TX slot is currently `initial`
    pub fn new(map: Arc<dyn SlotMap>, initial: SlotIndex, lock_timeout: Duration) -> Self {
        let space = SlotSpace::new(map.len());
        Self {
            map,
            space,
            lock_timeout,
            current: initial,
        }
    }

    /// The presently configured exclusive TX slot
    #[must_use]
    pub fn current(&self) -> SlotIndex {
        self.current
    }

    /// Move the TX assignment to `new`
    ///
    /// A request for the current slot is a no-op with zero calls into the
    /// slot map. Lock contention within the bounded wait yields
    /// [`MutationOutcome::Deferred`] rather than blocking; the caller
    /// reconsiders at the next cycle boundary.
    pub async fn apply(&mut self, new: SlotIndex) -> slotrl_core::Result<MutationOutcome> {
        self.space.validate(new)?;

        if new == self.current {
            return Ok(MutationOutcome::Unchanged);
        }

        match self.map.try_pause(self.lock_timeout).await {
            Ok(()) => {}
            Err(SchedulerError::LockContention { waited_ms }) => {
                debug!(
                    from = self.current.0,
                    to = new.0,
                    waited_ms,
                    "slot map busy, deferring mutation"
                );
                return Ok(MutationOutcome::Deferred);
            }
            Err(e) => return Err(e),
        }

        // The map must resume even if a role change fails mid-way.
        let installed = self.install(new).await;
        self.map.resume().await;

        match installed {
            Ok(()) => {
                self.current = new;
                debug!(slot = new.0, "TX slot reassigned");
                Ok(MutationOutcome::Applied)
            }
            Err(e) => {
                warn!(slot = new.0, error = %e, "slot role change failed");
                Err(e)
            }
        }
    }

    async fn install(&self, new: SlotIndex) -> slotrl_core::Result<()> {
        self.map.set_role(new, SlotRole::TxExclusive).await?;
        self.map.set_role(self.current, SlotRole::RxShared).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotrl_sim::SimMacLayer;

    fn mutator(mac: &Arc<SimMacLayer>) -> ScheduleMutator {
        let map: Arc<dyn SlotMap> = Arc::clone(mac) as Arc<dyn SlotMap>;
        ScheduleMutator::new(map, SlotIndex(0), Duration::from_millis(10))
    }

    #[tokio::test]
    async fn apply_moves_the_tx_slot() {
        let mac = Arc::new(SimMacLayer::new(5));
        let mut m = mutator(&mac);

        let outcome = m.apply(SlotIndex(3)).await.unwrap();
        assert_eq!(outcome, MutationOutcome::Applied);
        assert_eq!(m.current(), SlotIndex(3));
        assert_eq!(mac.tx_slots(), vec![SlotIndex(3)]);
    }

    #[tokio::test]
    async fn apply_same_slot_is_a_no_op() {
        let mac = Arc::new(SimMacLayer::new(5));
        let mut m = mutator(&mac);

        assert_eq!(m.apply(SlotIndex(0)).await.unwrap(), MutationOutcome::Unchanged);
        assert_eq!(m.apply(SlotIndex(0)).await.unwrap(), MutationOutcome::Unchanged);
        assert_eq!(mac.pause_calls(), 0);
        assert_eq!(mac.set_role_calls(), 0);
    }

    #[tokio::test]
    async fn contended_lock_defers_without_mutating() {
        let mac = Arc::new(SimMacLayer::new(5));
        let mut m = mutator(&mac);

        let hold = mac.hold_pause().await;
        let outcome = m.apply(SlotIndex(2)).await.unwrap();
        assert_eq!(outcome, MutationOutcome::Deferred);
        assert_eq!(m.current(), SlotIndex(0));
        assert_eq!(mac.tx_slots(), vec![SlotIndex(0)]);
        assert_eq!(mac.set_role_calls(), 0);
        drop(hold);

        // Next attempt goes through once the map is released
        assert_eq!(m.apply(SlotIndex(2)).await.unwrap(), MutationOutcome::Applied);
    }

    #[tokio::test]
    async fn out_of_range_slot_is_rejected_before_locking() {
        let mac = Arc::new(SimMacLayer::new(5));
        let mut m = mutator(&mac);

        assert!(m.apply(SlotIndex(5)).await.is_err());
        assert_eq!(mac.pause_calls(), 0);
    }
}
