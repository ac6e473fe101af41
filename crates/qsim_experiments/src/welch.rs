//! Welch's graphical procedure for locating the end of the transient.
//!
//! Checkpoint observations of each replication are averaged point by point
//! (truncated to the shortest replication) and then optionally smoothed with
//! a centred moving window.

use qsim_core::clock::CenterKind;
use qsim_core::observations::CenterObservations;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WelchPlot {
    pub center: CenterKind,
    pub name: String,
    pub points: Vec<f64>,
}

/// Pointwise mean over `series`, truncated to the shortest one.
pub fn welch_average(series: &[&[f64]]) -> Vec<f64> {
    let Some(len) = series.iter().map(|s| s.len()).min() else {
        return Vec::new();
    };
    let n = series.len() as f64;
    (0..len)
        .map(|i| series.iter().map(|s| s[i]).sum::<f64>() / n)
        .collect()
}

/// Welch's moving average with half-width `w`: near the start the window
/// shrinks to the points available on both sides.
pub fn moving_average(points: &[f64], w: usize) -> Vec<f64> {
    let m = points.len();
    if w == 0 || m <= 2 * w {
        return points.to_vec();
    }
    (0..m - w)
        .map(|i| {
            let half = i.min(w);
            let window = &points[i - half..=i + half];
            window.iter().sum::<f64>() / window.len() as f64
        })
        .collect()
}

/// One averaged plot per center across all runs' observations.
pub fn welch_plots(runs: &[Vec<CenterObservations>]) -> Vec<WelchPlot> {
    let Some(first) = runs.first() else {
        return Vec::new();
    };
    first
        .iter()
        .map(|series| {
            let per_run: Vec<&[f64]> = runs
                .iter()
                .filter_map(|run| run.iter().find(|s| s.center == series.center))
                .map(|s| s.points.as_slice())
                .collect();
            WelchPlot {
                center: series.center,
                name: series.name.clone(),
                points: welch_average(&per_run),
            }
        })
        .collect()
}
