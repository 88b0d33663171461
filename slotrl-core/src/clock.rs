//! Cycle-boundary clock

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::{interval, Interval, MissedTickBehavior};

/// Periodic trigger aligned to the slotted cycle's total duration
#[async_trait]
pub trait CycleClock: Send + Sync {
    /// Block until the next cycle boundary
    async fn wait_boundary(&self);
}

/// Wall-clock cycle boundaries at a fixed period
///
/// The period is either the slot duration times the cycle length, or an
/// independently configured interval.
pub struct IntervalClock {
    inner: Mutex<Interval>,
}

impl IntervalClock {
    /// Create a clock ticking every `period`
    #[must_use]
    pub fn new(period: Duration) -> Self {
        let mut ticker = interval(period);
        // A late loop iteration should not cause a burst of catch-up cycles
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            inner: Mutex::new(ticker),
        }
    }

    /// Clock for a cycle of `slots` slots of `slot_duration` each
    #[must_use]
    pub fn for_cycle(slots: usize, slot_duration: Duration) -> Self {
        Self::new(slot_duration * u32::try_from(slots).unwrap_or(u32::MAX))
    }
}

#[async_trait]
impl CycleClock for IntervalClock {
    async fn wait_boundary(&self) {
        self.inner.lock().await.tick().await;
    }
}
