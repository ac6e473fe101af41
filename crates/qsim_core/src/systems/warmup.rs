//! Warmup system: ends the transient phase of a batch-means run.

use bevy_ecs::prelude::{Res, ResMut};
use tracing::info;

use crate::centers::CenterNetwork;
use crate::clock::SimulationClock;
use crate::scenario::WarmupControl;

pub fn warmup_system(
    clock: Res<SimulationClock>,
    mut warmup: ResMut<WarmupControl>,
    mut network: ResMut<CenterNetwork>,
) {
    if !warmup.warming_up {
        return;
    }
    let served = network.min_total_served();
    if served < warmup.threshold {
        return;
    }

    let now = clock.now();
    network.stop_warmup(now);
    warmup.warming_up = false;
    warmup.completed_at = Some(now);
    info!(time = now, served, "warmup completed, collecting batch statistics");
}
