//! Simulated slotted MAC layer

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::trace;

use slotrl_core::{
    ActivitySignal, OutcomeReport, OutcomeSource, SchedulerError, SlotIndex, SlotMap, SlotRole,
    TransmissionOutcome,
};

/// In-memory stand-in for the external slotted MAC layer
///
/// Implements all three seams the scheduler consumes ([`SlotMap`],
/// [`OutcomeSource`], [`ActivitySignal`]) over plain in-memory state,
/// plus instrumentation hooks for tests: call counters for the exclusion
/// primitive and role changes, scriptable outcomes and activity, and a
/// [`hold_pause`](SimMacLayer::hold_pause) handle to force contention.
///
/// The initial map mirrors a fresh node bring-up: slot 0 is the TX slot,
/// every other slot is shared RX.
pub struct SimMacLayer {
    roles: RwLock<Vec<SlotRole>>,
    gate: Semaphore,
    pending: Mutex<Option<OutcomeReport>>,
    activity: RwLock<Vec<f64>>,
    pause_calls: AtomicUsize,
    set_role_calls: AtomicUsize,
}

/// Holds the MAC's exclusion gate until dropped
///
/// Models a slot-execution context that has not yielded; while a guard is
/// alive every `try_pause` times out.
pub struct PauseGuard<'a> {
    gate: &'a Semaphore,
}

impl Drop for PauseGuard<'_> {
    fn drop(&mut self) {
        self.gate.add_permits(1);
    }
}

impl SimMacLayer {
    /// A cycle of `slots` slots with TX at slot 0 and RX everywhere else
    #[must_use]
    pub fn new(slots: usize) -> Self {
        let mut roles = vec![SlotRole::RxShared; slots];
        if let Some(first) = roles.first_mut() {
            *first = SlotRole::TxExclusive;
        }
        Self {
            roles: RwLock::new(roles),
            gate: Semaphore::new(1),
            pending: Mutex::new(None),
            activity: RwLock::new(Vec::new()),
            pause_calls: AtomicUsize::new(0),
            set_role_calls: AtomicUsize::new(0),
        }
    }

    /// Script the outcome the next `take_outcome` call will observe
    pub fn post_outcome(&self, slot: SlotIndex, outcome: TransmissionOutcome) {
        let mut pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *pending = Some(OutcomeReport { slot, outcome });
    }

    /// Script the per-slot activity signal
    pub fn set_activity(&self, activity: Vec<f64>) {
        let mut current = self
            .activity
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *current = activity;
    }

    /// Seize the exclusion gate, as in-flight slot execution would
    pub async fn hold_pause(&self) -> PauseGuard<'_> {
        let permit = self
            .gate
            .acquire()
            .await
            .expect("pause gate is never closed");
        permit.forget();
        PauseGuard { gate: &self.gate }
    }

    /// Slots currently assigned the TX-exclusive role
    #[must_use]
    pub fn tx_slots(&self) -> Vec<SlotIndex> {
        self.roles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .enumerate()
            .filter(|(_, role)| **role == SlotRole::TxExclusive)
            .map(|(i, _)| SlotIndex(i))
            .collect()
    }

    /// Number of `try_pause` attempts observed so far
    #[must_use]
    pub fn pause_calls(&self) -> usize {
        self.pause_calls.load(Ordering::SeqCst)
    }

    /// Number of role changes observed so far
    #[must_use]
    pub fn set_role_calls(&self) -> usize {
        self.set_role_calls.load(Ordering::SeqCst)
    }

    fn current_tx(&self) -> SlotIndex {
        self.tx_slots().first().copied().unwrap_or(SlotIndex(0))
    }
}

#[async_trait]
impl SlotMap for SimMacLayer {
    fn len(&self) -> usize {
        self.roles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    async fn try_pause(&self, wait: Duration) -> slotrl_core::Result<()> {
        self.pause_calls.fetch_add(1, Ordering::SeqCst);
        match timeout(wait, self.gate.acquire()).await {
            Ok(Ok(permit)) => {
                permit.forget();
                Ok(())
            }
            Ok(Err(_)) => Err(SchedulerError::SlotMap("pause gate closed".into())),
            Err(_) => Err(SchedulerError::LockContention {
                waited_ms: u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }

    async fn resume(&self) {
        self.gate.add_permits(1);
    }

    async fn set_role(&self, slot: SlotIndex, role: SlotRole) -> slotrl_core::Result<()> {
        self.set_role_calls.fetch_add(1, Ordering::SeqCst);
        let mut roles = self
            .roles
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match roles.get_mut(slot.0) {
            Some(entry) => {
                trace!(slot = slot.0, ?role, "slot role changed");
                *entry = role;
                Ok(())
            }
            None => Err(SchedulerError::InvalidSlot {
                slot,
                len: roles.len(),
            }),
        }
    }
}

#[async_trait]
impl OutcomeSource for SimMacLayer {
    async fn take_outcome(&self) -> slotrl_core::Result<OutcomeReport> {
        let taken = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(taken.unwrap_or_else(|| OutcomeReport::no_attempt(self.current_tx())))
    }
}

impl ActivitySignal for SimMacLayer {
    fn observed_activity(&self) -> Vec<f64> {
        self.activity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
