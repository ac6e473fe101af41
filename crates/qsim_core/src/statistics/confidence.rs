//! Student-t confidence intervals over window series.

use serde::{Deserialize, Serialize};

use super::student::idf_student;
use super::{MetricIndex, WindowStatistics, METRIC_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub mean: f64,
    pub stdev: f64,
    pub half_width: f64,
    pub samples: usize,
}

impl ConfidenceInterval {
    pub fn contains(&self, value: f64) -> bool {
        (value - self.mean).abs() <= self.half_width
    }
}

/// Interval for the mean of `values` at `level_of_confidence`.
///
/// Mean and variance are accumulated with Welford's update; the half-width is
/// `t* · stdev / sqrt(n - 1)` with `stdev` the population standard deviation.
/// Returns `None` with fewer than two samples.
pub fn confidence_interval(values: &[f64], level_of_confidence: f64) -> Option<ConfidenceInterval> {
    let mut n = 0usize;
    let mut mean = 0.0;
    let mut sum = 0.0;
    for &value in values {
        n += 1;
        let diff = value - mean;
        sum += diff * diff * (n as f64 - 1.0) / n as f64;
        mean += diff / n as f64;
    }
    if n <= 1 {
        return None;
    }

    let stdev = (sum / n as f64).sqrt();
    let u = 1.0 - 0.5 * (1.0 - level_of_confidence);
    let t = idf_student((n - 1) as u64, u);
    Some(ConfidenceInterval {
        mean,
        stdev,
        half_width: t * stdev / ((n - 1) as f64).sqrt(),
        samples: n,
    })
}

/// Confidence intervals for all seven metrics of one center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceIntervals {
    intervals: [Option<ConfidenceInterval>; METRIC_COUNT],
}

impl ConfidenceIntervals {
    pub fn from_windows(windows: &WindowStatistics, level_of_confidence: f64) -> Self {
        let mut intervals = [None; METRIC_COUNT];
        for metric in MetricIndex::ALL {
            intervals[metric.index()] = confidence_interval(windows.series(metric), level_of_confidence);
        }
        Self { intervals }
    }

    pub fn get(&self, metric: MetricIndex) -> Option<&ConfidenceInterval> {
        self.intervals[metric.index()].as_ref()
    }

    pub fn half_width(&self, metric: MetricIndex) -> Option<f64> {
        self.get(metric).map(|ci| ci.half_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::WindowSample;

    #[test]
    fn too_few_samples_give_no_interval() {
        assert!(confidence_interval(&[], 0.95).is_none());
        assert!(confidence_interval(&[3.0], 0.95).is_none());
    }

    #[test]
    fn constant_series_has_zero_width() {
        let ci = confidence_interval(&[2.0; 10], 0.95).expect("ten samples");
        assert_eq!(ci.mean, 2.0);
        assert_eq!(ci.half_width, 0.0);
    }

    #[test]
    fn matches_hand_computed_interval() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let ci = confidence_interval(&values, 0.95).expect("ten samples");
        // population variance of 1..=10 is 8.25
        let expected = 2.262_157 * 8.25f64.sqrt() / 3.0;
        assert!((ci.mean - 5.5).abs() < 1e-12);
        assert!((ci.half_width - expected).abs() < 1e-3);
        assert!(ci.contains(5.5 + expected * 0.99));
        assert!(!ci.contains(5.5 + expected * 1.01));
    }

    #[test]
    fn higher_confidence_widens_interval() {
        let values = [0.9, 1.1, 1.3, 0.7, 1.0, 1.2];
        let narrow = confidence_interval(&values, 0.90).expect("six samples");
        let wide = confidence_interval(&values, 0.99).expect("six samples");
        assert!(wide.half_width > narrow.half_width);
    }

    #[test]
    fn more_samples_narrow_the_interval() {
        // ±1 around 5.0: the spread stays fixed while n grows.
        let widths: Vec<f64> = [10, 100, 1_000]
            .into_iter()
            .map(|n| {
                let values: Vec<f64> = (0..n).map(|i| if i % 2 == 0 { 4.0 } else { 6.0 }).collect();
                confidence_interval(&values, 0.95).expect("enough samples").half_width
            })
            .collect();
        assert!(widths[0] > widths[1], "{widths:?}");
        assert!(widths[1] > widths[2], "{widths:?}");
        assert!(widths[2] > 0.0);
    }

    #[test]
    fn per_metric_intervals() {
        let mut windows = WindowStatistics::default();
        windows.push(&WindowSample::from_values([1.0; METRIC_COUNT]));
        let intervals = ConfidenceIntervals::from_windows(&windows, 0.95);
        assert!(intervals.half_width(MetricIndex::Lambda).is_none());

        windows.push(&WindowSample::from_values([3.0; METRIC_COUNT]));
        let intervals = ConfidenceIntervals::from_windows(&windows, 0.95);
        for metric in MetricIndex::ALL {
            assert!(intervals.half_width(metric).expect("two windows") > 0.0);
        }
    }
}
