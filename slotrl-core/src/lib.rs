//! Core types and MAC-layer seams for adaptive slotted-schedule learning
//!
//! This crate provides the foundational abstractions shared by the
//! adaptive scheduler: the slot model, transmission outcomes, reward
//! mapping, and the traits behind which the external slotted MAC layer
//! (slot map, outcome source, activity signal, cycle clock) lives.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod activity;
pub mod clock;
pub mod error;
pub mod frame;
pub mod outcome;
pub mod reward;
pub mod slot;
pub mod slotmap;

// Re-export core traits and types
pub use activity::{ActivitySignal, NoActivity};
pub use clock::{CycleClock, IntervalClock};
pub use error::{Result, SchedulerError};
pub use frame::{classify_frame, decode_seqnum, encode_seqnum, LinkTag};
pub use outcome::{OutcomeReport, OutcomeSource, TransmissionOutcome};
pub use reward::{OutcomeRewards, Reward};
pub use slot::{SlotIndex, SlotRole, SlotSpace};
pub use slotmap::SlotMap;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ActivitySignal, CycleClock, OutcomeReport, OutcomeSource, Result, SlotIndex, SlotMap,
        SlotRole, SlotSpace, TransmissionOutcome,
    };
}
