#![allow(dead_code)]

use bevy_ecs::prelude::World;
use qsim_core::clock::CenterKind;
use qsim_core::config::{CenterConfig, RideCenterConfig, SimulationConfig};
use qsim_core::runner::initialize_simulation;
use qsim_core::scenario::{build_simulation, RunMode};

/// Builder for reproducible test worlds.
#[derive(Debug, Clone)]
pub struct TestWorldBuilder {
    config: SimulationConfig,
    mode: Option<RunMode>,
    seed: u64,
}

impl Default for TestWorldBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorldBuilder {
    pub fn new() -> Self {
        Self {
            config: SimulationConfig::default(),
            mode: None,
            seed: 42,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replaces the network with one exponential single-server center.
    pub fn single_server(mut self, mean_service: f64) -> Self {
        self.config = self
            .config
            .with_centers(vec![CenterConfig::new(CenterKind::Small, 1, mean_service)])
            .with_exponential_service(true);
        self
    }

    pub fn with_ride(mut self, ride: RideCenterConfig) -> Self {
        self.config = self.config.with_ride(ride);
        self
    }

    pub fn batch_means(mut self, batch_size: usize, num_batches: usize) -> Self {
        self.config = self.config.with_batches(batch_size, num_batches);
        self.mode = Some(RunMode::BatchMeans);
        self
    }

    pub fn finite_horizon(mut self, stop: f64) -> Self {
        self.config = self.config.with_observation_time(stop);
        self.mode = Some(RunMode::FiniteHorizon { stop });
        self
    }

    pub fn configure(mut self, f: impl FnOnce(SimulationConfig) -> SimulationConfig) -> Self {
        self.config = f(self.config);
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Builds the world and schedules the first arrivals.
    pub fn build(self) -> World {
        let mode = self.mode.unwrap_or_else(|| RunMode::finite(&self.config));
        let mut world = World::new();
        build_simulation(&mut world, &self.config, mode, self.seed).expect("test config should be valid");
        initialize_simulation(&mut world);
        world
    }
}
