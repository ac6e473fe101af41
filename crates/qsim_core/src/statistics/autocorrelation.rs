//! Lag-1 autocorrelation, used to judge whether batches are long enough to
//! be treated as independent.

use serde::{Deserialize, Serialize};

use super::MetricIndex;

/// `Σ(xᵢ−μ)(xᵢ₊₁−μ) / Σ(xᵢ−μ)²`. `None` for fewer than two values or a
/// constant series.
pub fn lag1(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let denominator: f64 = values.iter().map(|x| (x - mean).powi(2)).sum();
    if denominator == 0.0 {
        return None;
    }
    let numerator: f64 = values
        .windows(2)
        .map(|pair| (pair[0] - mean) * (pair[1] - mean))
        .sum();
    Some(numerator / denominator)
}

/// One metric series with its lag-1 autocorrelation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchMetric {
    pub metric: MetricIndex,
    pub values: Vec<f64>,
    pub acf: Option<f64>,
}

impl BatchMetric {
    pub fn new(metric: MetricIndex, values: Vec<f64>) -> Self {
        let acf = lag1(&values);
        Self {
            metric,
            values,
            acf,
        }
    }

    /// Rule of thumb: |acf| below 0.2 means the batches are roughly independent.
    pub fn is_uncorrelated(&self) -> bool {
        self.acf.is_some_and(|acf| acf.abs() < 0.2)
    }
}
