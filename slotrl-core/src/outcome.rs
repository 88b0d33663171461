//! Transmission outcomes reported by the MAC layer

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::slot::SlotIndex;

/// Result of the transmission attempt (if any) on the node's TX slot
/// during the just-elapsed cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransmissionOutcome {
    /// The frame was acknowledged
    Success,
    /// The frame was sent but not acknowledged
    Failure,
    /// No frame was offered on the TX slot this cycle
    NoAttempt,
}

/// One cycle's outcome, tagged with the slot assignment it belongs to
///
/// The tag lets the consumer discard a report that raced with a schedule
/// mutation and no longer matches the live assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeReport {
    /// The TX slot the attempt (or non-attempt) was observed on
    pub slot: SlotIndex,
    /// What happened on that slot
    pub outcome: TransmissionOutcome,
}

impl OutcomeReport {
    /// A report that nothing was attempted on `slot`
    #[must_use]
    pub fn no_attempt(slot: SlotIndex) -> Self {
        Self {
            slot,
            outcome: TransmissionOutcome::NoAttempt,
        }
    }
}

/// Source of per-cycle transmission outcomes (the external MAC layer)
#[async_trait]
pub trait OutcomeSource: Send + Sync {
    /// Take the pending outcome for the currently assigned TX slot,
    /// clearing it in the same step
    ///
    /// Consumption is at-most-once: a second call within the same cycle
    /// yields `NoAttempt` rather than replaying a stale outcome.
    async fn take_outcome(&self) -> crate::Result<OutcomeReport>;
}
