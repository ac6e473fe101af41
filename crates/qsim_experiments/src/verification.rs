//! Comparison of simulated means against analytical results.

use qsim_core::clock::CenterKind;
use qsim_core::statistics::{ConfidenceIntervals, MeanStatistics, MetricIndex, METRIC_COUNT};
use serde::{Deserialize, Serialize};

use crate::analytical::AnalyticalResult;
use crate::metrics::CenterSummary;

/// Absolute differences `|analytical − simulated|` for one center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub kind: CenterKind,
    pub name: String,
    diffs: [f64; METRIC_COUNT],
}

impl ComparisonResult {
    pub fn new(analytical: &AnalyticalResult, means: &MeanStatistics) -> Self {
        let mut diffs = [0.0; METRIC_COUNT];
        for metric in MetricIndex::ALL {
            diffs[metric.index()] = (analytical.get(metric) - means.get(metric)).abs();
        }
        Self {
            kind: analytical.kind,
            name: analytical.name.clone(),
            diffs,
        }
    }

    pub fn diff(&self, metric: MetricIndex) -> f64 {
        self.diffs[metric.index()]
    }
}

/// Pairs every analytical result with the simulated center of the same kind.
/// Centers without windows are skipped.
pub fn compare(analytical: &[AnalyticalResult], summaries: &[CenterSummary]) -> Vec<ComparisonResult> {
    analytical
        .iter()
        .filter_map(|expected| {
            let summary = summaries.iter().find(|s| s.kind == expected.kind)?;
            let means = summary.means.as_ref()?;
            Some(ComparisonResult::new(expected, means))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationStatus {
    /// Difference within the confidence half-width.
    Within,
    Outside,
    /// The analytical model is unstable.
    Diverges,
    /// Too few windows for a confidence interval.
    NoInterval,
}

impl VerificationStatus {
    pub fn label(self) -> &'static str {
        match self {
            VerificationStatus::Within => "ok",
            VerificationStatus::Outside => "outside",
            VerificationStatus::Diverges => "diverges",
            VerificationStatus::NoInterval => "n/a",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub kind: CenterKind,
    pub name: String,
    pub stable: bool,
    pub comparison: ComparisonResult,
    pub intervals: ConfidenceIntervals,
    pub means: MeanStatistics,
}

impl VerificationResult {
    pub fn status(&self, metric: MetricIndex) -> VerificationStatus {
        if !self.stable {
            return VerificationStatus::Diverges;
        }
        match self.intervals.half_width(metric) {
            Some(half_width) if self.comparison.diff(metric) <= half_width => VerificationStatus::Within,
            Some(_) => VerificationStatus::Outside,
            None => VerificationStatus::NoInterval,
        }
    }

    pub fn all_within(&self) -> bool {
        MetricIndex::ALL
            .into_iter()
            .all(|metric| self.status(metric) == VerificationStatus::Within)
    }
}

/// Verifies every simulated center that has an analytical counterpart.
pub fn verify(analytical: &[AnalyticalResult], summaries: &[CenterSummary]) -> Vec<VerificationResult> {
    analytical
        .iter()
        .filter_map(|expected| {
            let summary = summaries.iter().find(|s| s.kind == expected.kind)?;
            let means = summary.means?;
            Some(VerificationResult {
                kind: expected.kind,
                name: summary.name.clone(),
                stable: expected.is_stable(),
                comparison: ComparisonResult::new(expected, &means),
                intervals: summary.intervals,
                means,
            })
        })
        .collect()
}
