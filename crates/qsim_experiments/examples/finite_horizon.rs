//! Example: finite-horizon replications of the three-center network.
//!
//! Loads a configuration file (default: `config/default.json` at the workspace
//! root), runs the replications in parallel, prints the confidence intervals
//! and the analytical comparison, and writes all exports to `output/`.
//!
//! ```text
//! cargo run -p qsim_experiments --example finite_horizon --release [config.json]
//! ```

use std::path::PathBuf;

use qsim_core::config::SimulationConfig;
use qsim_core::statistics::MetricIndex;
use qsim_experiments::{
    analytical_results, export_summaries_json, export_verification_csv, export_welch_csv,
    export_windows_csv, export_windows_parquet, moving_average, run_replications, verify,
    welch_plots, ExperimentOptions,
};

fn config_path() -> PathBuf {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config/default.json"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let path = config_path();
    println!("Loading configuration from {}", path.display());
    let config = SimulationConfig::from_path(&path)?;

    println!(
        "Running {} replications of {:.0} time units...",
        config.general.runs_number, config.general.observation_time
    );
    let result = run_replications(&config, &ExperimentOptions::default())?;
    if result.incomplete_runs > 0 {
        println!("Warning: {} runs hit the step limit", result.incomplete_runs);
    }

    let summaries = result.summaries();
    println!("\n=== Confidence intervals ({:.0}%) ===", config.general.level_of_confidence * 100.0);
    for summary in &summaries {
        println!("{} ({} servers, {} runs)", summary.name, summary.servers, summary.windows);
        for metric in MetricIndex::ALL {
            match summary.intervals.get(metric) {
                Some(ci) => println!("  {:>6}: {:.4} ± {:.4}", metric.label(), ci.mean, ci.half_width),
                None => println!("  {:>6}: n/a", metric.label()),
            }
        }
    }

    let analytical = analytical_results(&config);
    let checks = verify(&analytical, &summaries);
    println!("\n=== Analytical comparison ===");
    for check in &checks {
        println!("{}:", check.name);
        for metric in MetricIndex::ALL {
            println!(
                "  {:>6}: diff {:.4} [{}]",
                metric.label(),
                check.comparison.diff(metric),
                check.status(metric).label()
            );
        }
    }

    let plots = welch_plots(&result.observations);
    for plot in &plots {
        let smoothed = moving_average(&plot.points, 5);
        if let Some(last) = smoothed.last() {
            println!("Welch {}: {} points, last smoothed E[Ts] {:.4}", plot.name, plot.points.len(), last);
        }
    }

    println!("\nExporting results...");
    export_windows_csv(&result, "output/finite_horizon_runs.csv")?;
    export_windows_parquet(&result, "output/finite_horizon_runs.parquet")?;
    export_summaries_json(&summaries, "output/finite_horizon_summary.json")?;
    export_verification_csv(&checks, "output/finite_horizon_verification.csv")?;
    if plots.iter().any(|p| !p.points.is_empty()) {
        export_welch_csv(&plots, "output/finite_horizon_welch.csv")?;
    }
    println!("Done.");
    Ok(())
}
