//! Checkpoint system: samples every center's running mean response time when
//! the queue emits a `SaveStat` sentinel. Batch-means runs only sample after
//! warmup.

use bevy_ecs::prelude::{Res, ResMut};
use tracing::debug;

use crate::centers::CenterNetwork;
use crate::clock::CurrentEvent;
use crate::observations::ObservationLog;
use crate::scenario::WarmupControl;

pub fn checkpoint_system(
    event: Res<CurrentEvent>,
    network: Res<CenterNetwork>,
    warmup: Option<Res<WarmupControl>>,
    mut observations: ResMut<ObservationLog>,
) {
    if !event.0.is_save_stat() {
        return;
    }
    if warmup.is_some_and(|w| w.warming_up) {
        return;
    }
    observations.record(&network);
    debug!(time = event.0.time, "checkpoint observations recorded");
}
