pub mod area;
pub mod centers;
pub mod clock;
pub mod config;
pub mod distributions;
pub mod error;
pub mod observations;
pub mod queue;
pub mod rng;
pub mod runner;
pub mod scenario;
pub mod statistics;
pub mod systems;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
