//! Seam to the external slot map and its exclusion primitive

use std::time::Duration;

use async_trait::async_trait;

use crate::slot::{SlotIndex, SlotRole};

/// The external slot map: per-slot roles within the unicast cycle, plus
/// the pause/resume primitive that serializes schedule mutation against
/// in-flight slot execution
///
/// Role changes are only legal between a successful [`try_pause`] and the
/// matching [`resume`]; mutating a link while the slot-execution context
/// may be referencing it is undefined behavior on real hardware.
///
/// [`try_pause`]: SlotMap::try_pause
/// [`resume`]: SlotMap::resume
#[async_trait]
pub trait SlotMap: Send + Sync {
    /// Number of slots in the unicast cycle
    fn len(&self) -> usize;

    /// Whether the cycle has no slots (degenerate, never true in practice)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Acquire exclusive mutation rights, waiting at most `timeout`
    ///
    /// Returns [`SchedulerError::LockContention`] if slot execution did not
    /// yield within the bound; the caller must defer, not retry in place.
    ///
    /// [`SchedulerError::LockContention`]: crate::SchedulerError::LockContention
    async fn try_pause(&self, timeout: Duration) -> crate::Result<()>;

    /// Release exclusive mutation rights and let slot execution continue
    async fn resume(&self);

    /// Install `role` for `slot`, replacing its previous role
    async fn set_role(&self, slot: SlotIndex, role: SlotRole) -> crate::Result<()>;
}
