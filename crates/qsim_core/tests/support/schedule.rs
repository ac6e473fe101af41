#![allow(dead_code)]

use bevy_ecs::prelude::World;
use bevy_ecs::schedule::Schedule;
use qsim_core::runner::{run_next_event, run_until_done, simulation_schedule};

/// Helper that owns a reusable `Schedule` so tests can step or drain a run.
pub struct ScheduleRunner {
    schedule: Schedule,
}

impl Default for ScheduleRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleRunner {
    pub fn new() -> Self {
        Self {
            schedule: simulation_schedule(),
        }
    }

    /// Run a single event (returns `true` if an event was processed).
    pub fn run_one(&mut self, world: &mut World) -> bool {
        run_next_event(world, &mut self.schedule).expect("step should succeed")
    }

    /// Run up to `max_steps` events, returning the number of steps executed.
    pub fn run_until_done(&mut self, world: &mut World, max_steps: usize) -> usize {
        run_until_done(world, &mut self.schedule, max_steps).expect("run should succeed")
    }

    /// Drive the run to its end.
    pub fn run_full(&mut self, world: &mut World) -> usize {
        self.run_until_done(world, usize::MAX)
    }
}
