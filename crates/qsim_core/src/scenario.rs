//! Builds a simulation world from a [SimulationConfig].

use bevy_ecs::prelude::{Resource, World};

use crate::centers::CenterNetwork;
use crate::clock::SimulationClock;
use crate::config::SimulationConfig;
use crate::error::SimError;
use crate::observations::ObservationLog;
use crate::queue::EventQueue;
use crate::rng::RngStreams;

/// Simulation start time.
pub const START_TIME: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunMode {
    /// Independent replication: arrivals stop at `stop` and the run ends once
    /// every job has left the network.
    FiniteHorizon { stop: f64 },
    /// One long run that ends once every center has collected all its batches.
    BatchMeans,
}

impl RunMode {
    pub fn finite(config: &SimulationConfig) -> Self {
        RunMode::FiniteHorizon {
            stop: config.general.observation_time,
        }
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, RunMode::BatchMeans)
    }

    /// Time after which no external arrivals are generated.
    pub fn arrival_stop(&self) -> f64 {
        match self {
            RunMode::FiniteHorizon { stop } => *stop,
            RunMode::BatchMeans => f64::INFINITY,
        }
    }
}

#[derive(Debug, Clone, Copy, Resource)]
pub struct RunSettings {
    pub mode: RunMode,
    pub seed: u64,
}

/// Warmup detection for batch-means runs: once the slowest center has served
/// `threshold` jobs, every center drops its warmup data and starts batching.
#[derive(Debug, Clone, Copy, Resource)]
pub struct WarmupControl {
    pub threshold: u64,
    pub warming_up: bool,
    pub completed_at: Option<f64>,
}

impl WarmupControl {
    pub fn new(threshold: u64) -> Self {
        Self {
            threshold,
            warming_up: true,
            completed_at: None,
        }
    }
}

/// Inserts clock, queue, RNG streams, centers and observation log into `world`.
pub fn build_simulation(
    world: &mut World,
    config: &SimulationConfig,
    mode: RunMode,
    seed: u64,
) -> Result<(), SimError> {
    let network = CenterNetwork::from_config(config, mode.is_batch())?;
    let queue = match config.general.checkpoint_interval {
        Some(interval) => EventQueue::with_checkpoints(interval),
        None => EventQueue::new(),
    };

    world.insert_resource(SimulationClock::starting_at(START_TIME));
    world.insert_resource(queue);
    world.insert_resource(RngStreams::new(seed));
    world.insert_resource(ObservationLog::for_network(&network));
    world.insert_resource(network);
    world.insert_resource(RunSettings { mode, seed });
    if mode.is_batch() {
        world.insert_resource(WarmupControl::new(config.general.warmup_threshold()));
    }
    Ok(())
}
