//! Example: one batch-means run with lag-1 autocorrelation checks.
//!
//! ```text
//! cargo run -p qsim_experiments --example batch_means --release [config.json]
//! ```

use std::path::PathBuf;

use qsim_core::config::SimulationConfig;
use qsim_experiments::{
    analytical_results, export_summaries_json, export_verification_csv, export_windows_csv,
    run_batch_means, verify, ExperimentOptions,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config/default.json"));
    let config = SimulationConfig::from_path(&path)?;

    println!(
        "Batch means: {} batches of {} jobs, warmup {} completions",
        config.general.num_batches,
        config.general.batch_size,
        config.general.warmup_threshold()
    );
    let result = run_batch_means(&config, &ExperimentOptions::default())?;
    let summaries = result.summaries();

    for summary in &summaries {
        println!("\n{} ({} batches)", summary.name, summary.windows);
        for batch_metric in &summary.autocorrelation {
            let acf = batch_metric
                .acf
                .map(|acf| format!("{acf:+.3}"))
                .unwrap_or_else(|| "n/a".to_string());
            let flag = if batch_metric.is_uncorrelated() { "" } else { "  (correlated)" };
            println!("  {:>6}: acf {acf}{flag}", batch_metric.metric.label());
        }
    }

    let checks = verify(&analytical_results(&config), &summaries);
    for check in &checks {
        println!("{}: all metrics within interval = {}", check.name, check.all_within());
    }

    export_windows_csv(&result, "output/batch_means_batches.csv")?;
    export_summaries_json(&summaries, "output/batch_means_summary.json")?;
    export_verification_csv(&checks, "output/batch_means_verification.csv")?;
    Ok(())
}
