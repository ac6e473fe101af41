pub mod arrival;
pub mod checkpoint;
pub mod completion;
pub mod warmup;

use bevy_ecs::prelude::Res;

use crate::clock::{CurrentEvent, EventKind};
use crate::scenario::WarmupControl;

pub fn is_arrival(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::Arrival(_)))
        .unwrap_or(false)
}

pub fn is_completion(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::Completion(_)))
        .unwrap_or(false)
}

pub fn is_save_stat(event: Option<Res<CurrentEvent>>) -> bool {
    event.map(|e| e.0.is_save_stat()).unwrap_or(false)
}

/// Arrivals and completions; excludes checkpoint sentinels.
pub fn is_real_event(event: Option<Res<CurrentEvent>>) -> bool {
    event.map(|e| !e.0.is_save_stat()).unwrap_or(false)
}

/// Batch-means run that has not finished warming up.
pub fn warmup_pending(warmup: Option<Res<WarmupControl>>) -> bool {
    warmup.map(|w| w.warming_up).unwrap_or(false)
}
