//! Per-center results of an experiment and their summaries.
//!
//! A [CenterResult] holds the raw windows collected for one center: one per
//! replication in finite-horizon experiments, one per batch in batch-means
//! experiments. [CenterSummary] condenses them into means, confidence
//! intervals and lag-1 autocorrelations.

use qsim_core::clock::CenterKind;
use qsim_core::observations::CenterObservations;
use qsim_core::statistics::{mean, BatchMetric, ConfidenceIntervals, MeanStatistics, WindowStatistics};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperimentKind {
    FiniteHorizon,
    BatchMeans,
}

impl ExperimentKind {
    /// Header of the window index column in exported tables.
    pub fn window_label(self) -> &'static str {
        match self {
            ExperimentKind::FiniteHorizon => "#Run",
            ExperimentKind::BatchMeans => "#Batch",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ExperimentKind::FiniteHorizon => "finite_horizon",
            ExperimentKind::BatchMeans => "batch_means",
        }
    }
}

/// Raw windows collected for one center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CenterResult {
    pub kind: CenterKind,
    pub name: String,
    pub servers: usize,
    pub windows: WindowStatistics,
    /// Jobs counted per replication (a single entry for batch means).
    pub jobs_served: Vec<f64>,
    pub busy_time: Vec<f64>,
    pub feedback_served: u64,
}

impl CenterResult {
    pub fn summarize(&self, level_of_confidence: f64) -> CenterSummary {
        CenterSummary {
            kind: self.kind,
            name: self.name.clone(),
            servers: self.servers,
            windows: self.windows.len(),
            means: self.windows.mean_statistics(),
            intervals: self.windows.confidence_intervals(level_of_confidence),
            autocorrelation: self.windows.batch_metrics(),
            mean_jobs_served: mean(&self.jobs_served),
            mean_busy_time: mean(&self.busy_time),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CenterSummary {
    pub kind: CenterKind,
    pub name: String,
    pub servers: usize,
    pub windows: usize,
    pub means: Option<MeanStatistics>,
    pub intervals: ConfidenceIntervals,
    pub autocorrelation: Vec<BatchMetric>,
    pub mean_jobs_served: Option<f64>,
    pub mean_busy_time: Option<f64>,
}

/// Everything an experiment produced, in run order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResult {
    pub kind: ExperimentKind,
    pub level_of_confidence: f64,
    pub seeds: Vec<u64>,
    pub centers: Vec<CenterResult>,
    /// Checkpoint observations, one entry per run.
    pub observations: Vec<Vec<CenterObservations>>,
    /// Runs cut short by the step limit.
    pub incomplete_runs: usize,
}

impl ExperimentResult {
    pub fn center(&self, kind: CenterKind) -> Option<&CenterResult> {
        self.centers.iter().find(|c| c.kind == kind)
    }

    pub fn summaries(&self) -> Vec<CenterSummary> {
        self.centers
            .iter()
            .map(|c| c.summarize(self.level_of_confidence))
            .collect()
    }
}
