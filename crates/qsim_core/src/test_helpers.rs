//! Test helpers for common test setup and utilities.
//!
//! Shared configurations and world builders used by unit tests, integration
//! tests and benches.

use bevy_ecs::prelude::World;

use crate::centers::CenterNetwork;
use crate::clock::CenterKind;
use crate::config::{CenterConfig, SimulationConfig};
use crate::runner::initialize_simulation;
use crate::scenario::{build_simulation, RunMode};

/// Seed used by tests that only need *some* reproducible stream.
pub const TEST_SEED: u64 = 123_456_789;

/// Single-server exponential queue with arrival rate 1 and the given mean service time.
pub fn mm1_config(mean_service: f64) -> SimulationConfig {
    SimulationConfig::default()
        .with_centers(vec![CenterConfig::new(CenterKind::Small, 1, mean_service)])
        .with_inter_arrival_time(1.0)
        .with_exponential_service(true)
}

/// `servers`-server exponential queue with arrival rate 1.
pub fn mmc_config(servers: usize, mean_service: f64) -> SimulationConfig {
    SimulationConfig::default()
        .with_centers(vec![CenterConfig::new(CenterKind::Small, servers, mean_service)])
        .with_inter_arrival_time(1.0)
        .with_exponential_service(true)
}

/// World built from `config` with first arrivals already scheduled.
///
/// # Panics
///
/// Panics if `config` is invalid.
pub fn create_test_world(config: &SimulationConfig, mode: RunMode, seed: u64) -> World {
    let mut world = World::new();
    build_simulation(&mut world, config, mode, seed).expect("test config should be valid");
    initialize_simulation(&mut world);
    world
}

/// Network with no scheduled events, for driving centers by hand.
///
/// # Panics
///
/// Panics if `config` is invalid.
pub fn test_network(config: &SimulationConfig, batch_mode: bool) -> CenterNetwork {
    CenterNetwork::from_config(config, batch_mode).expect("test config should be valid")
}
