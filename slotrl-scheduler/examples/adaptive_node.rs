//! Example: one node adapting its TX slot against a simulated MAC layer

use std::sync::Arc;
use std::time::Duration;

use slotrl_core::{
    ActivitySignal, CycleClock, IntervalClock, OutcomeSource, SlotIndex, SlotMap,
    TransmissionOutcome,
};
use slotrl_scheduler::{AdaptiveScheduler, SchedulerConfig};
use slotrl_sim::{SimMacLayer, TrafficGenerator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Simulated 5-slot unicast cycle; neighbors hammer slots 0, 2 and 4
    let mac = Arc::new(SimMacLayer::new(5));
    mac.set_activity(vec![4.0, 0.5, 3.0, 0.1, 2.0]);

    let config = SchedulerConfig {
        cycle_period: Duration::from_millis(5),
        ..SchedulerConfig::default()
    };
    let clock = IntervalClock::new(config.cycle_period);
    let mut scheduler = AdaptiveScheduler::new(
        config,
        Arc::clone(&mac) as Arc<dyn SlotMap>,
        Arc::clone(&mac) as Arc<dyn OutcomeSource>,
        Arc::clone(&mac) as Arc<dyn ActivitySignal>,
        SlotIndex(0),
    )?;
    let handle = scheduler.handle();

    // Run a few hundred cycles; transmissions collide on busy slots and
    // succeed on quiet ones.
    let mut traffic = TrafficGenerator::new();
    let num_cycles = 300;
    for _ in 0..num_cycles {
        clock.wait_boundary().await;

        let payload = traffic.next_payload();
        let tag = handle.classify_outgoing(&payload);
        let busy = mac.observed_activity()[tag.timeslot.0] > 1.0;
        let outcome = if busy {
            TransmissionOutcome::Failure
        } else {
            TransmissionOutcome::Success
        };
        mac.post_outcome(tag.timeslot, outcome);

        scheduler.run_cycle().await?;
    }

    // Print where the node settled
    let snapshot = handle.snapshot().await;
    println!(
        "After {} cycles the node transmits on slot {}",
        snapshot.cycle, snapshot.current_slot
    );
    for (i, (value, occupancy)) in snapshot
        .values
        .iter()
        .zip(&snapshot.occupancy)
        .enumerate()
    {
        println!(
            "slot {}: value = {:>8.4}, occupancy = {:>7.4}",
            i, value, occupancy
        );
    }

    Ok(())
}
