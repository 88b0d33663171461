//! In-memory slotted MAC layer and test traffic for the adaptive scheduler
//!
//! This crate fakes exactly the seams the scheduler core consumes: a slot
//! map with a pause/resume exclusion gate, a peek-and-clear outcome
//! source, and a scriptable per-slot activity signal. Integration tests
//! and the demo drive the control loop against it.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod mac;
pub mod traffic;

pub use mac::{PauseGuard, SimMacLayer};
pub use traffic::{delivery_stats, DeliveryStats, TrafficGenerator};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{SimMacLayer, TrafficGenerator};
    pub use slotrl_core::prelude::*;
}
