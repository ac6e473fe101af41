use qsim_core::clock::CenterKind;
use qsim_core::config::{CenterConfig, SimulationConfig};
use qsim_core::rng::derive_run_seeds;
use qsim_core::runner::run_simulation;
use qsim_core::scenario::RunMode;
use qsim_core::statistics::{MetricIndex, RunStatistics};

fn mm1(observation_time: f64) -> SimulationConfig {
    SimulationConfig::default()
        .with_centers(vec![CenterConfig::new(CenterKind::Small, 1, 0.5)])
        .with_exponential_service(true)
        .with_inter_arrival_time(1.0)
        .with_observation_time(observation_time)
}

fn replicate(config: &SimulationConfig, runs: usize) -> RunStatistics {
    let seeds = derive_run_seeds(config.general.seed, runs, config.general.seed_stream_index);
    let mut merged = RunStatistics::default();
    for seed in seeds {
        let outcome = run_simulation(config, RunMode::finite(config), seed, usize::MAX).expect("run succeeds");
        let small = outcome.center(CenterKind::Small).expect("small center");
        merged.merge(&small.run_statistics);
    }
    merged
}

#[test]
fn replications_produce_one_window_each() {
    let config = mm1(2_000.0);
    let merged = replicate(&config, 8);

    assert_eq!(merged.windows.len(), 8);
    assert_eq!(merged.jobs_served.len(), 8);
    assert!(merged.mean_jobs_served().is_some_and(|jobs| (1_800.0..2_200.0).contains(&jobs)));

    let intervals = merged.windows.confidence_intervals(0.95);
    let response = intervals.get(MetricIndex::ResponseTime).expect("interval defined");
    assert!((0.7..1.3).contains(&response.mean), "E[Ts] = {}", response.mean);
    assert!(response.half_width > 0.0);
    assert_eq!(response.samples, 8);
}

#[test]
fn replications_are_reproducible() {
    let config = mm1(300.0);
    assert_eq!(replicate(&config, 3), replicate(&config, 3));
}

#[test]
fn different_seeds_give_different_runs() {
    let config = mm1(300.0);
    let seeds = derive_run_seeds(config.general.seed, 2, config.general.seed_stream_index);
    let a = run_simulation(&config, RunMode::finite(&config), seeds[0], usize::MAX).expect("run succeeds");
    let b = run_simulation(&config, RunMode::finite(&config), seeds[1], usize::MAX).expect("run succeeds");
    assert_ne!(a.end_time, b.end_time);
}

#[test]
fn busy_time_never_exceeds_run_length() {
    let config = SimulationConfig::default().with_observation_time(500.0);
    let outcome = run_simulation(&config, RunMode::finite(&config), 11, usize::MAX).expect("run succeeds");
    for center in &outcome.centers {
        let busy = center.run_statistics.busy_time[0];
        assert!(busy <= outcome.end_time * center.servers as f64, "{}", center.name);
        assert!(center.total_served > 0);
    }
}
