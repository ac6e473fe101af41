//! Experiment execution: parallel finite-horizon replications and single
//! batch-means runs.
//!
//! Replications run on a rayon pool. Every replication owns its world, so the
//! only shared state is the progress bar; seeds are derived up front and
//! results are merged in run order, which keeps the outcome independent of
//! thread scheduling.

use indicatif::{ProgressBar, ProgressStyle};
use qsim_core::config::SimulationConfig;
use qsim_core::error::SimError;
use qsim_core::rng::derive_run_seeds;
use qsim_core::runner::{run_simulation, RunOutcome};
use qsim_core::scenario::RunMode;
use qsim_core::statistics::RunStatistics;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

use crate::metrics::{CenterResult, ExperimentKind, ExperimentResult};

/// Default cap on events per run.
pub const DEFAULT_MAX_STEPS: usize = 50_000_000;

#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error(transparent)]
    Simulation(#[from] SimError),
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("experiment needs at least one run")]
    NoRuns,
}

#[derive(Debug, Clone)]
pub struct ExperimentOptions {
    pub num_threads: Option<usize>,
    pub show_progress: bool,
    pub max_steps: usize,
}

impl Default for ExperimentOptions {
    fn default() -> Self {
        Self {
            num_threads: None,
            show_progress: true,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl ExperimentOptions {
    pub fn quiet() -> Self {
        Self {
            show_progress: false,
            ..Self::default()
        }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = Some(threads);
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }
}

fn progress_bar(total: usize) -> ProgressBar {
    let bar = ProgressBar::new(total as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

/// Runs `config.general.runs_number` independent finite-horizon replications.
///
/// The first replication uses the master seed; each later one is seeded from
/// the previous seed's `seed_stream_index` stream.
pub fn run_replications(
    config: &SimulationConfig,
    options: &ExperimentOptions,
) -> Result<ExperimentResult, ExperimentError> {
    let runs = config.general.runs_number;
    if runs == 0 {
        return Err(ExperimentError::NoRuns);
    }
    config.validate()?;
    let seeds = derive_run_seeds(config.general.seed, runs, config.general.seed_stream_index);
    let mode = RunMode::finite(config);

    let pb = options.show_progress.then(|| progress_bar(runs));
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = options.num_threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build()?;

    let pb_clone = pb.clone();
    let outcomes: Result<Vec<RunOutcome>, SimError> = pool.install(|| {
        seeds
            .par_iter()
            .map(|&seed| {
                let outcome = run_simulation(config, mode, seed, options.max_steps);
                if let Some(ref progress_bar) = pb_clone {
                    progress_bar.inc(1);
                }
                outcome
            })
            .collect()
    });
    if let Some(ref progress_bar) = pb {
        progress_bar.finish_with_message("Completed");
    }
    let outcomes = outcomes?;

    let result = merge_replications(config, seeds, outcomes);
    info!(
        runs,
        incomplete = result.incomplete_runs,
        "finite-horizon replications finished"
    );
    Ok(result)
}

fn merge_replications(config: &SimulationConfig, seeds: Vec<u64>, outcomes: Vec<RunOutcome>) -> ExperimentResult {
    let mut centers: Vec<CenterResult> = Vec::new();
    let mut merged: Vec<RunStatistics> = Vec::new();
    let mut observations = Vec::with_capacity(outcomes.len());
    let mut incomplete_runs = 0;

    for outcome in outcomes {
        if !outcome.completed {
            warn!(seed = outcome.seed, steps = outcome.steps, "replication hit the step limit");
            incomplete_runs += 1;
        }
        for report in &outcome.centers {
            let index = match centers.iter().position(|c| c.kind == report.kind) {
                Some(index) => index,
                None => {
                    centers.push(CenterResult {
                        kind: report.kind,
                        name: report.name.clone(),
                        servers: report.servers,
                        windows: Default::default(),
                        jobs_served: Vec::new(),
                        busy_time: Vec::new(),
                        feedback_served: 0,
                    });
                    merged.push(RunStatistics::default());
                    centers.len() - 1
                }
            };
            merged[index].merge(&report.run_statistics);
            centers[index].feedback_served += report.feedback_served;
        }
        observations.push(outcome.observations);
    }

    for (center, stats) in centers.iter_mut().zip(merged) {
        center.windows = stats.windows;
        center.jobs_served = stats.jobs_served;
        center.busy_time = stats.busy_time;
    }

    ExperimentResult {
        kind: ExperimentKind::FiniteHorizon,
        level_of_confidence: config.general.level_of_confidence,
        seeds,
        centers,
        observations,
        incomplete_runs,
    }
}

/// Runs one batch-means simulation seeded with the master seed.
pub fn run_batch_means(
    config: &SimulationConfig,
    options: &ExperimentOptions,
) -> Result<ExperimentResult, ExperimentError> {
    let seed = config.general.seed;
    let outcome = run_simulation(config, RunMode::BatchMeans, seed, options.max_steps)?;
    if !outcome.completed {
        warn!(seed, steps = outcome.steps, "batch-means run hit the step limit");
    }

    let centers = outcome
        .centers
        .into_iter()
        .map(|report| CenterResult {
            kind: report.kind,
            name: report.name,
            servers: report.servers,
            windows: report.batch_statistics.windows,
            jobs_served: vec![report.total_served as f64],
            busy_time: Vec::new(),
            feedback_served: report.feedback_served,
        })
        .collect();

    info!(seed, steps = outcome.steps, end_time = outcome.end_time, "batch-means run finished");
    Ok(ExperimentResult {
        kind: ExperimentKind::BatchMeans,
        level_of_confidence: config.general.level_of_confidence,
        seeds: vec![seed],
        centers,
        observations: vec![outcome.observations],
        incomplete_runs: usize::from(!outcome.completed),
    })
}
