//! Simulation runner: advances the clock and routes events into the ECS.
//!
//! Clock progression and area integration happen here, outside systems. Each
//! step pops the next event from [EventQueue], integrates every center's
//! populations up to the event time, inserts the event as [CurrentEvent] and
//! then runs the schedule.

use bevy_ecs::prelude::{Mut, Schedule, World};
use bevy_ecs::schedule::IntoSystemConfigs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::centers::CenterNetwork;
use crate::clock::{CenterKind, CurrentEvent, Event, SimulationClock};
use crate::config::SimulationConfig;
use crate::error::SimError;
use crate::observations::{CenterObservations, ObservationLog};
use crate::queue::EventQueue;
use crate::rng::RngStreams;
use crate::scenario::{build_simulation, RunMode, RunSettings, START_TIME};
use crate::statistics::{BatchStatistics, RunStatistics};
use crate::systems::{
    arrival::arrival_system, checkpoint::checkpoint_system, completion::completion_system,
    is_arrival, is_completion, is_real_event, is_save_stat, warmup::warmup_system, warmup_pending,
};

/// Runs one simulation step.
///
/// Returns `Ok(false)` once the run is over: the queue drained in finite-horizon
/// mode, or every center collected all its batches in batch-means mode. An
/// empty queue in batch-means mode is an error.
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> Result<bool, SimError> {
    let mode = world.resource::<RunSettings>().mode;
    match mode {
        RunMode::FiniteHorizon { .. } => {
            if world.resource_mut::<EventQueue>().peek_time().is_none() {
                return Ok(false);
            }
        }
        RunMode::BatchMeans => {
            if world.resource::<CenterNetwork>().all_done() {
                return Ok(false);
            }
        }
    }

    let event = world.resource_mut::<EventQueue>().pop()?;
    if !event.is_save_stat() {
        advance_clock(world, event.time);
    }
    world.insert_resource(CurrentEvent(event));
    schedule.run(world);
    Ok(true)
}

/// Integrates areas over `[now, time]` and moves the clock to `time`.
fn advance_clock(world: &mut World, time: f64) {
    let mut clock = *world.resource::<SimulationClock>();
    clock.set_next(time);
    world.resource_mut::<CenterNetwork>().update_areas(&clock);
    clock.advance();
    world.insert_resource(clock);
}

/// Runs one step and invokes `hook` after the schedule completes.
pub fn run_next_event_with_hook<F>(
    world: &mut World,
    schedule: &mut Schedule,
    mut hook: F,
) -> Result<bool, SimError>
where
    F: FnMut(&World, &Event),
{
    if !run_next_event(world, schedule)? {
        return Ok(false);
    }
    let event = world.resource::<CurrentEvent>().0;
    hook(world, &event);
    Ok(true)
}

/// Runs steps until the run is over or `max_steps` is reached.
/// Returns the number of steps executed.
pub fn run_until_done(world: &mut World, schedule: &mut Schedule, max_steps: usize) -> Result<usize, SimError> {
    let mut steps = 0;
    while steps < max_steps && run_next_event(world, schedule)? {
        steps += 1;
    }
    Ok(steps)
}

/// Runs steps until done and invokes `hook` after each step.
pub fn run_until_done_with_hook<F>(
    world: &mut World,
    schedule: &mut Schedule,
    max_steps: usize,
    mut hook: F,
) -> Result<usize, SimError>
where
    F: FnMut(&World, &Event),
{
    let mut steps = 0;
    while steps < max_steps && run_next_event_with_hook(world, schedule, &mut hook)? {
        steps += 1;
    }
    Ok(steps)
}

/// Builds the simulation schedule.
///
/// Systems are conditionally executed based on event type. Warmup detection
/// runs after the center has processed the event so completions are counted.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            arrival_system.run_if(is_arrival),
            completion_system.run_if(is_completion),
            warmup_system.run_if(is_real_event).run_if(warmup_pending),
            checkpoint_system.run_if(is_save_stat),
        )
            .chain(),
    );
    schedule
}

/// Resets every center and schedules the first external arrivals.
/// Call this after [build_simulation] and before running events.
pub fn initialize_simulation(world: &mut World) {
    let stop = world.resource::<RunSettings>().mode.arrival_stop();
    world.resource_scope(|world, mut network: Mut<CenterNetwork>| {
        world.resource_scope(|world, mut queue: Mut<EventQueue>| {
            let mut rng = world.resource_mut::<RngStreams>();
            network.start_run(&mut queue, &mut rng, START_TIME, stop);
        });
    });
}

/// Per-center results of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CenterReport {
    pub kind: CenterKind,
    pub name: String,
    pub servers: usize,
    pub run_statistics: RunStatistics,
    pub batch_statistics: BatchStatistics,
    pub total_served: u64,
    pub feedback_served: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub seed: u64,
    pub centers: Vec<CenterReport>,
    pub observations: Vec<CenterObservations>,
    pub end_time: f64,
    pub steps: usize,
    /// False when the step limit cut the run short.
    pub completed: bool,
}

impl RunOutcome {
    pub fn center(&self, kind: CenterKind) -> Option<&CenterReport> {
        self.centers.iter().find(|c| c.kind == kind)
    }
}

/// Closes the run and extracts its results from `world`.
///
/// Finite-horizon runs append one window per center to the run statistics.
pub fn finish_run(world: &mut World, steps: usize, completed: bool) -> RunOutcome {
    let settings = *world.resource::<RunSettings>();
    if !settings.mode.is_batch() {
        world.resource_mut::<CenterNetwork>().save_run_statistics();
    }
    let end_time = world.resource::<SimulationClock>().now();
    let observations = world
        .remove_resource::<ObservationLog>()
        .map(ObservationLog::into_series)
        .unwrap_or_default();

    let centers = world
        .resource::<CenterNetwork>()
        .centers()
        .iter()
        .map(|center| {
            let core = center.core();
            CenterReport {
                kind: core.kind,
                name: core.name.clone(),
                servers: core.server_count(),
                run_statistics: core.run_statistics.clone(),
                batch_statistics: core.batch_statistics.clone(),
                total_served: core.total_served,
                feedback_served: core.feedback_served,
            }
        })
        .collect();

    info!(
        seed = settings.seed,
        end_time,
        steps,
        completed,
        jobs_left = world.resource::<CenterNetwork>().jobs_in_system(),
        "run finished"
    );
    RunOutcome {
        seed: settings.seed,
        centers,
        observations,
        end_time,
        steps,
        completed,
    }
}

/// Builds, runs and closes one simulation.
pub fn run_simulation(
    config: &SimulationConfig,
    mode: RunMode,
    seed: u64,
    max_steps: usize,
) -> Result<RunOutcome, SimError> {
    let mut world = World::new();
    build_simulation(&mut world, config, mode, seed)?;
    initialize_simulation(&mut world);

    let mut schedule = simulation_schedule();
    let steps = run_until_done(&mut world, &mut schedule, max_steps)?;
    let completed = steps < max_steps;
    if !completed {
        debug!(seed, max_steps, "step limit reached");
    }
    Ok(finish_run(&mut world, steps, completed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CenterConfig;
    use crate::statistics::MetricIndex;

    fn mm1() -> SimulationConfig {
        SimulationConfig::default()
            .with_centers(vec![CenterConfig::new(CenterKind::Small, 1, 0.5)])
            .with_inter_arrival_time(1.0)
    }

    #[test]
    fn finite_run_records_one_window() {
        let config = mm1().with_observation_time(500.0);
        let outcome = run_simulation(&config, RunMode::finite(&config), 3, 1_000_000).expect("run succeeds");

        assert!(outcome.completed);
        assert!(outcome.end_time >= 400.0);
        let small = outcome.center(CenterKind::Small).expect("small center");
        assert_eq!(small.run_statistics.windows.len(), 1);
        assert_eq!(small.run_statistics.jobs_served, vec![small.total_served as f64]);
        assert!(small.batch_statistics.windows.is_empty());
    }

    #[test]
    fn same_seed_same_outcome() {
        let config = mm1().with_observation_time(100.0);
        let a = run_simulation(&config, RunMode::finite(&config), 17, 1_000_000).expect("run succeeds");
        let b = run_simulation(&config, RunMode::finite(&config), 17, 1_000_000).expect("run succeeds");
        assert_eq!(a.steps, b.steps);
        assert_eq!(a.end_time, b.end_time);
        assert_eq!(
            a.centers[0].run_statistics.windows.series(MetricIndex::ResponseTime),
            b.centers[0].run_statistics.windows.series(MetricIndex::ResponseTime)
        );
    }

    #[test]
    fn step_limit_marks_run_incomplete() {
        let config = mm1().with_batches(1_000, 10);
        let outcome = run_simulation(&config, RunMode::BatchMeans, 1, 50).expect("run succeeds");
        assert!(!outcome.completed);
        assert_eq!(outcome.steps, 50);
    }

    #[test]
    fn clock_never_moves_backwards() {
        let config = mm1().with_observation_time(50.0).with_checkpoint_interval(2.0);
        let mut world = World::new();
        build_simulation(&mut world, &config, RunMode::finite(&config), 8).expect("valid config");
        initialize_simulation(&mut world);

        let mut schedule = simulation_schedule();
        let mut last = START_TIME;
        run_until_done_with_hook(&mut world, &mut schedule, 100_000, |world, _| {
            let now = world.resource::<SimulationClock>().now();
            assert!(now >= last);
            last = now;
        })
        .expect("run succeeds");
        assert!(last > 0.0);
    }
}
