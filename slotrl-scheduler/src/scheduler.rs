//! The cyclic control loop tying the engine together

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use slotrl_core::{
    classify_frame, ActivitySignal, CycleClock, LinkTag, OutcomeRewards, OutcomeSource,
    SchedulerError, SlotIndex, SlotMap, TransmissionOutcome,
};

use crate::mutator::{MutationOutcome, ScheduleMutator};
use crate::occupancy::OccupancyTable;
use crate::policy::{ExplorationParams, ExplorationPolicy};
use crate::value::{QLearningParams, ValueTable};

/// Configuration for the adaptive scheduler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Number of slots in the unicast cycle
    pub slots: usize,
    /// Q-learning constants
    pub q: QLearningParams,
    /// Outcome-to-reward mapping
    pub rewards: OutcomeRewards,
    /// Exploration schedule
    pub exploration: ExplorationParams,
    /// Per-cycle occupancy decay factor, in `(0, 1)`
    pub occupancy_decay: f64,
    /// Length of one full cycle in wall-clock time
    pub cycle_period: Duration,
    /// Bounded wait for the slot map's exclusion primitive
    pub lock_timeout: Duration,
    /// Initialize the value table from uniform random draws instead of zeros
    pub random_init: bool,
    /// RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            slots: 5,
            q: QLearningParams::default(),
            rewards: OutcomeRewards::default(),
            exploration: ExplorationParams::default(),
            occupancy_decay: 0.9,
            cycle_period: Duration::from_millis(50),
            lock_timeout: Duration::from_millis(10),
            random_init: false,
            seed: None,
        }
    }
}

/// Read-only view of the scheduler's tables for diagnostics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Completed cycles since startup
    pub cycle: u64,
    /// The exclusive TX slot at snapshot time
    pub current_slot: SlotIndex,
    /// Value table contents
    pub values: Vec<f64>,
    /// Occupancy table contents
    pub occupancy: Vec<f64>,
}

/// Shared state read by [`SchedulerHandle`]
struct Shared {
    current: AtomicUsize,
    cycle: AtomicU64,
    telemetry: RwLock<TelemetrySnapshot>,
}

/// Cheap, cloneable host-facing view of a running scheduler
///
/// The host's outgoing-data dispatch uses
/// [`classify_outgoing`](SchedulerHandle::classify_outgoing) to tag data
/// with the node's live TX slot; the table snapshots feed telemetry.
#[derive(Clone)]
pub struct SchedulerHandle {
    shared: Arc<Shared>,
}

impl SchedulerHandle {
    /// The live exclusive TX slot
    #[must_use]
    pub fn current_slot(&self) -> SlotIndex {
        SlotIndex(self.shared.current.load(Ordering::Acquire))
    }

    /// Completed scheduling cycles since startup
    #[must_use]
    pub fn cycle(&self) -> u64 {
        self.shared.cycle.load(Ordering::Acquire)
    }

    /// Classify an outgoing unit of data against the live TX slot
    #[must_use]
    pub fn classify_outgoing(&self, payload: &[u8]) -> LinkTag {
        classify_frame(payload, self.current_slot())
    }

    /// Snapshot of the value and occupancy tables
    pub async fn snapshot(&self) -> TelemetrySnapshot {
        self.shared.telemetry.read().await.clone()
    }
}

/// Orchestrates the per-cycle adaptation loop
///
/// Owns the value table, the occupancy tracker, the exploration policy,
/// and the schedule mutator as plain fields with explicit lifetime; the
/// only shared state is the published telemetry behind
/// [`SchedulerHandle`]. Each cycle: consume the last outcome, fold it
/// into the value table, decay occupancy, pick the next action, and hand
/// it to the mutator.
pub struct AdaptiveScheduler {
    config: SchedulerConfig,
    values: ValueTable,
    occupancy: OccupancyTable,
    policy: ExplorationPolicy,
    mutator: ScheduleMutator,
    outcomes: Arc<dyn OutcomeSource>,
    activity: Arc<dyn ActivitySignal>,
    rng: StdRng,
    cycle: u64,
    shared: Arc<Shared>,
}

impl AdaptiveScheduler {
    /// Build a scheduler over an externally constructed slot map whose
    /// TX slot is currently `initial`
    pub fn new(
        config: SchedulerConfig,
        map: Arc<dyn SlotMap>,
        outcomes: Arc<dyn OutcomeSource>,
        activity: Arc<dyn ActivitySignal>,
        initial: SlotIndex,
    ) -> slotrl_core::Result<Self> {
        if map.len() != config.slots {
            return Err(SchedulerError::SlotMap(format!(
                "slot map has {} slots, config expects {}",
                map.len(),
                config.slots
            )));
        }
        if initial.0 >= config.slots {
            return Err(SchedulerError::InvalidSlot {
                slot: initial,
                len: config.slots,
            });
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let values = if config.random_init {
            ValueTable::random(config.slots, &mut rng)
        } else {
            ValueTable::zeros(config.slots)
        };
        let occupancy = OccupancyTable::new(config.slots);
        let policy = ExplorationPolicy::new(config.exploration);
        let mutator = ScheduleMutator::new(map, initial, config.lock_timeout);

        let shared = Arc::new(Shared {
            current: AtomicUsize::new(initial.0),
            cycle: AtomicU64::new(0),
            telemetry: RwLock::new(TelemetrySnapshot {
                cycle: 0,
                current_slot: initial,
                values: values.snapshot(),
                occupancy: occupancy.snapshot(),
            }),
        });

        Ok(Self {
            config,
            values,
            occupancy,
            policy,
            mutator,
            outcomes,
            activity,
            rng,
            cycle: 0,
            shared,
        })
    }

    /// Host-facing view of the running scheduler
    #[must_use]
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// The presently configured exclusive TX slot
    #[must_use]
    pub fn current_slot(&self) -> SlotIndex {
        self.mutator.current()
    }

    /// Completed scheduling cycles since startup
    #[must_use]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Read-only view of the value table
    #[must_use]
    pub fn values(&self) -> &ValueTable {
        &self.values
    }

    /// Read-only view of the occupancy table
    #[must_use]
    pub fn occupancy(&self) -> &OccupancyTable {
        &self.occupancy
    }

    /// Run the control loop until the process is shut down
    pub async fn run(&mut self, clock: &dyn CycleClock) -> slotrl_core::Result<()> {
        info!(
            slots = self.config.slots,
            initial = self.mutator.current().0,
            "adaptive scheduler started"
        );
        loop {
            clock.wait_boundary().await;
            self.run_cycle().await?;
        }
    }

    /// One full iteration of the adaptation loop
    ///
    /// Never aborts on the recoverable taxonomy: a contended lock or a
    /// desynchronized outcome costs one cycle's adaptation, nothing more.
    pub async fn run_cycle(&mut self) -> slotrl_core::Result<()> {
        // 1. Consume the last outcome. Cleared on read, before any
        //    mutation, so attribution stays deterministic.
        let report = self.outcomes.take_outcome().await?;

        // 2. Fold the outcome into the value table.
        if report.outcome != TransmissionOutcome::NoAttempt {
            if report.slot == self.mutator.current() {
                if let Some(reward) = self.config.rewards.reward(report.outcome) {
                    self.values
                        .update(report.slot, reward, &self.config.q);
                    debug!(
                        slot = report.slot.0,
                        outcome = ?report.outcome,
                        value = self.values.get(report.slot),
                        "value updated"
                    );
                }
            } else {
                warn!(
                    reported = report.slot.0,
                    current = self.mutator.current().0,
                    "discarding outcome for superseded slot assignment"
                );
            }
        }

        // 3. Decay occupancy with whatever activity the MAC exposes.
        let activity = self.activity.observed_activity();
        self.occupancy.decay(self.config.occupancy_decay, &activity);

        // 4. Pick the next action.
        let explore = self.policy.should_explore(self.cycle, &mut self.rng);
        let chosen = if explore {
            self.occupancy.min_slot()
        } else {
            self.values.best_slot()
        };

        // 5. Mutate the live schedule; a deferral leaves the current
        //    assignment in place until the next boundary.
        match self.mutator.apply(chosen).await? {
            MutationOutcome::Applied => {
                info!(slot = chosen.0, explore, "TX slot moved");
            }
            MutationOutcome::Unchanged => {}
            MutationOutcome::Deferred => {
                debug!(slot = chosen.0, "mutation deferred to next cycle");
            }
        }

        // 6. Close out the cycle and publish telemetry.
        self.cycle += 1;
        self.publish().await;
        Ok(())
    }

    async fn publish(&self) {
        self.shared
            .current
            .store(self.mutator.current().0, Ordering::Release);
        self.shared.cycle.store(self.cycle, Ordering::Release);
        let mut telemetry = self.shared.telemetry.write().await;
        *telemetry = TelemetrySnapshot {
            cycle: self.cycle,
            current_slot: self.mutator.current(),
            values: self.values.snapshot(),
            occupancy: self.occupancy.snapshot(),
        };
    }
}
