//! Per-center performance statistics.
//!
//! A [WindowSample] condenses one observation window (a whole run, or one
//! batch) into the seven steady-state metrics. [RunStatistics] collects one
//! sample per replication, [BatchStatistics] one per batch.

pub mod autocorrelation;
pub mod confidence;
pub mod student;

use serde::{Deserialize, Serialize};

use crate::area::{Area, ServerSum};

pub use autocorrelation::{lag1, BatchMetric};
pub use confidence::{confidence_interval, ConfidenceInterval, ConfidenceIntervals};

pub const METRIC_COUNT: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricIndex {
    ResponseTime,
    QueueTime,
    ServiceTime,
    SystemPopulation,
    QueuePopulation,
    Utilization,
    Lambda,
}

impl MetricIndex {
    /// Fixed column order used by every export.
    pub const ALL: [MetricIndex; METRIC_COUNT] = [
        MetricIndex::ResponseTime,
        MetricIndex::QueueTime,
        MetricIndex::ServiceTime,
        MetricIndex::SystemPopulation,
        MetricIndex::QueuePopulation,
        MetricIndex::Utilization,
        MetricIndex::Lambda,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            MetricIndex::ResponseTime => "E[Ts]",
            MetricIndex::QueueTime => "E[Tq]",
            MetricIndex::ServiceTime => "E[s]",
            MetricIndex::SystemPopulation => "E[Ns]",
            MetricIndex::QueuePopulation => "E[Nq]",
            MetricIndex::Utilization => "ρ",
            MetricIndex::Lambda => "λ",
        }
    }

    /// Identifier-safe name, used for Parquet columns and JSON keys.
    pub fn name(self) -> &'static str {
        match self {
            MetricIndex::ResponseTime => "response_time",
            MetricIndex::QueueTime => "queue_time",
            MetricIndex::ServiceTime => "service_time",
            MetricIndex::SystemPopulation => "system_population",
            MetricIndex::QueuePopulation => "queue_population",
            MetricIndex::Utilization => "utilization",
            MetricIndex::Lambda => "lambda",
        }
    }
}

/// The seven metrics of one observation window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSample {
    values: [f64; METRIC_COUNT],
}

impl WindowSample {
    pub fn from_values(values: [f64; METRIC_COUNT]) -> Self {
        Self { values }
    }

    /// Computes the window metrics. Returns `None` when no job completed in
    /// the window.
    ///
    /// With more than one server, E[s] averages the per-server means over
    /// servers that served at least one job and ρ is `λ·E[s]/servers`; a
    /// single server uses its service area instead.
    pub fn compute(
        area: &Area,
        sums: &[ServerSum],
        last_arrival_time: f64,
        last_completion_time: f64,
        window_start: f64,
    ) -> Option<Self> {
        let served: u64 = sums.iter().map(|s| s.served).sum();
        if served == 0 {
            return None;
        }
        let served = served as f64;
        let arrival_span = last_arrival_time - window_start;
        let completion_span = last_completion_time - window_start;

        let lambda = served / arrival_span;
        let response_time = area.node / served;
        let system_population = area.node / completion_span;
        let queue_time = area.queue / served;
        let queue_population = area.queue / completion_span;

        let (service_time, utilization) = if sums.len() > 1 {
            let per_server: Vec<f64> = sums
                .iter()
                .filter(|s| s.served > 0)
                .map(|s| s.service / s.served as f64)
                .collect();
            let service_time = per_server.iter().sum::<f64>() / per_server.len() as f64;
            (service_time, lambda * service_time / sums.len() as f64)
        } else {
            let only = sums[0];
            (
                only.service / only.served as f64,
                area.service / completion_span,
            )
        };

        let mut values = [0.0; METRIC_COUNT];
        values[MetricIndex::ResponseTime.index()] = response_time;
        values[MetricIndex::QueueTime.index()] = queue_time;
        values[MetricIndex::ServiceTime.index()] = service_time;
        values[MetricIndex::SystemPopulation.index()] = system_population;
        values[MetricIndex::QueuePopulation.index()] = queue_population;
        values[MetricIndex::Utilization.index()] = utilization;
        values[MetricIndex::Lambda.index()] = lambda;
        Some(Self { values })
    }

    pub fn get(&self, metric: MetricIndex) -> f64 {
        self.values[metric.index()]
    }

    pub fn values(&self) -> &[f64; METRIC_COUNT] {
        &self.values
    }
}

/// Seven append-only metric series, one entry per window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowStatistics {
    series: [Vec<f64>; METRIC_COUNT],
}

impl WindowStatistics {
    pub fn push(&mut self, sample: &WindowSample) {
        for metric in MetricIndex::ALL {
            self.series[metric.index()].push(sample.get(metric));
        }
    }

    pub fn series(&self, metric: MetricIndex) -> &[f64] {
        &self.series[metric.index()]
    }

    /// Number of complete windows.
    pub fn len(&self) -> usize {
        self.series.iter().map(Vec::len).min().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sample(&self, window: usize) -> Option<WindowSample> {
        if window >= self.len() {
            return None;
        }
        let mut values = [0.0; METRIC_COUNT];
        for metric in MetricIndex::ALL {
            values[metric.index()] = self.series[metric.index()][window];
        }
        Some(WindowSample { values })
    }

    pub fn mean_statistics(&self) -> Option<MeanStatistics> {
        if self.is_empty() {
            return None;
        }
        let mut values = [0.0; METRIC_COUNT];
        for metric in MetricIndex::ALL {
            let series = self.series(metric);
            values[metric.index()] = series.iter().sum::<f64>() / series.len() as f64;
        }
        Some(MeanStatistics { values })
    }

    pub fn confidence_intervals(&self, level_of_confidence: f64) -> ConfidenceIntervals {
        ConfidenceIntervals::from_windows(self, level_of_confidence)
    }

    /// Lag-1 autocorrelation of every metric series.
    pub fn batch_metrics(&self) -> Vec<BatchMetric> {
        MetricIndex::ALL
            .into_iter()
            .map(|metric| BatchMetric::new(metric, self.series(metric).to_vec()))
            .collect()
    }

    pub fn clear(&mut self) {
        for series in &mut self.series {
            series.clear();
        }
    }
}

/// One window per independent replication, plus per-run job and busy-time totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub windows: WindowStatistics,
    pub jobs_served: Vec<f64>,
    pub busy_time: Vec<f64>,
}

impl RunStatistics {
    pub fn record(&mut self, sample: Option<&WindowSample>, jobs_served: f64, busy_time: f64) {
        if let Some(sample) = sample {
            self.windows.push(sample);
        }
        self.jobs_served.push(jobs_served);
        self.busy_time.push(busy_time);
    }

    pub fn mean_busy_time(&self) -> Option<f64> {
        mean(&self.busy_time)
    }

    pub fn mean_jobs_served(&self) -> Option<f64> {
        mean(&self.jobs_served)
    }

    /// Appends another center's replications, preserving order.
    pub fn merge(&mut self, other: &RunStatistics) {
        for window in 0..other.windows.len() {
            if let Some(sample) = other.windows.sample(window) {
                self.windows.push(&sample);
            }
        }
        self.jobs_served.extend_from_slice(&other.jobs_served);
        self.busy_time.extend_from_slice(&other.busy_time);
    }
}

/// Batch-means samples of one long run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchStatistics {
    pub windows: WindowStatistics,
    num_batches: usize,
}

impl BatchStatistics {
    pub fn new(num_batches: usize) -> Self {
        Self {
            windows: WindowStatistics::default(),
            num_batches,
        }
    }

    pub fn record(&mut self, sample: &WindowSample) {
        self.windows.push(sample);
    }

    pub fn num_batches(&self) -> usize {
        self.num_batches
    }

    /// True once every metric series holds at least `num_batches` samples.
    pub fn is_done(&self) -> bool {
        self.windows.len() >= self.num_batches
    }
}

/// Per-metric means of a set of windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanStatistics {
    values: [f64; METRIC_COUNT],
}

impl MeanStatistics {
    pub fn from_values(values: [f64; METRIC_COUNT]) -> Self {
        Self { values }
    }

    pub fn get(&self, metric: MetricIndex) -> f64 {
        self.values[metric.index()]
    }

    pub fn response_time(&self) -> f64 {
        self.get(MetricIndex::ResponseTime)
    }

    pub fn queue_time(&self) -> f64 {
        self.get(MetricIndex::QueueTime)
    }

    pub fn service_time(&self) -> f64 {
        self.get(MetricIndex::ServiceTime)
    }

    pub fn system_population(&self) -> f64 {
        self.get(MetricIndex::SystemPopulation)
    }

    pub fn queue_population(&self) -> f64 {
        self.get(MetricIndex::QueuePopulation)
    }

    pub fn utilization(&self) -> f64 {
        self.get(MetricIndex::Utilization)
    }

    pub fn lambda(&self) -> f64 {
        self.get(MetricIndex::Lambda)
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
