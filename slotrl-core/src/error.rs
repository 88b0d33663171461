//! Error types for the scheduler core

use thiserror::Error;

use crate::slot::SlotIndex;

/// Core error type for scheduler operations
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// The slot map's exclusion primitive could not be acquired within the
    /// bounded wait; the caller defers the mutation to the next cycle
    #[error("slot map lock contention: not acquired within {waited_ms}ms")]
    LockContention {
        /// How long the acquisition was attempted, in milliseconds
        waited_ms: u64,
    },

    /// A slot index outside the unicast cycle
    #[error("invalid slot {slot:?}: cycle has {len} slots")]
    InvalidSlot {
        /// The offending slot index
        slot: SlotIndex,
        /// Number of slots in the cycle
        len: usize,
    },

    /// Slot-map collaborator errors
    #[error("slot map error: {0}")]
    SlotMap(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for scheduler operations
pub type Result<T> = std::result::Result<T, SchedulerError>;
