//! Experiment framework for the queueing-network simulator.
//!
//! Runs independent finite-horizon replications in parallel or one long
//! batch-means run, summarizes the collected windows, checks them against
//! closed-form M/M/1, M/M/c and M/M/∞ results, and exports everything to
//! CSV, JSON and Parquet.
//!
//! # Quick Start
//!
//! ```no_run
//! use qsim_core::config::SimulationConfig;
//! use qsim_experiments::{analytical_results, run_replications, verify, ExperimentOptions};
//!
//! let config = SimulationConfig::default().with_runs(16);
//! let result = run_replications(&config, &ExperimentOptions::default()).unwrap();
//! let checks = verify(&analytical_results(&config), &result.summaries());
//! for check in &checks {
//!     println!("{}: all within interval = {}", check.name, check.all_within());
//! }
//! ```
//!
//! # Architecture
//!
//! - [`runner`]: replications on a rayon pool, batch-means runs
//! - [`metrics`]: per-center results and summaries
//! - [`analytical`]: closed-form queueing results
//! - [`verification`]: simulated vs analytical comparison
//! - [`welch`]: Welch plots from checkpoint observations
//! - [`export`]: CSV/JSON/Parquet writers

pub mod analytical;
pub mod export;
pub mod metrics;
pub mod runner;
pub mod verification;
pub mod welch;

pub use analytical::{analytical_results, AnalyticalResult};
pub use export::{
    export_summaries_json, export_verification_csv, export_welch_csv, export_windows_csv,
    export_windows_parquet, ExportError,
};
pub use metrics::{CenterResult, CenterSummary, ExperimentKind, ExperimentResult};
pub use runner::{run_batch_means, run_replications, ExperimentError, ExperimentOptions};
pub use verification::{compare, verify, ComparisonResult, VerificationResult, VerificationStatus};
pub use welch::{moving_average, welch_plots, WelchPlot};
