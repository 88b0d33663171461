//! Online Q-learning transmit-slot scheduler for slotted mesh MACs
//!
//! Each node owns exactly one exclusive TX slot within a repeating
//! unicast cycle. This crate learns, online and without central
//! coordination, which slot collides least: a per-slot value table is
//! updated from transmission outcomes, a decaying occupancy table tracks
//! contention pressure, and an epsilon-greedy policy trades exploring
//! quiet slots against exploiting the best-known one. A schedule mutator
//! moves the live TX assignment under the MAC layer's exclusion
//! primitive.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod mutator;
pub mod occupancy;
pub mod policy;
pub mod scheduler;
pub mod value;

// Re-export the engine pieces
pub use mutator::{MutationOutcome, ScheduleMutator};
pub use occupancy::OccupancyTable;
pub use policy::{ExplorationParams, ExplorationPolicy};
pub use scheduler::{AdaptiveScheduler, SchedulerConfig, SchedulerHandle, TelemetrySnapshot};
pub use value::{QLearningParams, ValueTable};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AdaptiveScheduler, ExplorationPolicy, OccupancyTable, ScheduleMutator, SchedulerConfig,
        ValueTable,
    };
    pub use slotrl_core::prelude::*;
}
