//! Per-slot recent-activity signal consumed by the occupancy tracker

/// Optional per-slot traffic-pressure signal from the MAC layer
///
/// Deployments without such a signal use [`NoActivity`], which degrades
/// the occupancy decay to pure exponential decay toward zero.
pub trait ActivitySignal: Send + Sync {
    /// Recent observed activity per slot, one entry per slot index
    ///
    /// Entries are non-negative; larger means busier. A slice shorter than
    /// the cycle is padded with zeros by the consumer.
    fn observed_activity(&self) -> Vec<f64>;
}

/// Null activity signal: every slot reports zero activity
#[derive(Debug, Clone, Copy, Default)]
pub struct NoActivity;

impl ActivitySignal for NoActivity {
    fn observed_activity(&self) -> Vec<f64> {
        Vec::new()
    }
}
