//! Closed-form steady-state results for M/M/1, M/M/c and M/M/∞ centers.
//!
//! Unstable centers (ρ ≥ 1) report `f64::INFINITY` for every time and
//! population metric.

use qsim_core::clock::CenterKind;
use qsim_core::config::SimulationConfig;
use qsim_core::statistics::MetricIndex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticalResult {
    pub kind: CenterKind,
    pub name: String,
    pub lambda: f64,
    pub rho: f64,
    pub queue_time: f64,
    pub queue_population: f64,
    pub response_time: f64,
    pub system_population: f64,
    pub service_time: f64,
}

impl AnalyticalResult {
    fn unstable(kind: CenterKind, name: &str, lambda: f64, rho: f64, service_time: f64) -> Self {
        Self {
            kind,
            name: name.to_string(),
            lambda,
            rho,
            queue_time: f64::INFINITY,
            queue_population: f64::INFINITY,
            response_time: f64::INFINITY,
            system_population: f64::INFINITY,
            service_time,
        }
    }

    pub fn is_stable(&self) -> bool {
        self.rho < 1.0
    }

    pub fn get(&self, metric: MetricIndex) -> f64 {
        match metric {
            MetricIndex::ResponseTime => self.response_time,
            MetricIndex::QueueTime => self.queue_time,
            MetricIndex::ServiceTime => self.service_time,
            MetricIndex::SystemPopulation => self.system_population,
            MetricIndex::QueuePopulation => self.queue_population,
            MetricIndex::Utilization => self.rho,
            MetricIndex::Lambda => self.lambda,
        }
    }
}

fn factorial(n: usize) -> f64 {
    (1..=n).map(|i| i as f64).product()
}

/// Probability that an M/M/m center is empty, with per-server utilization `rho`.
pub fn empty_probability(m: usize, rho: f64) -> f64 {
    let offered = m as f64 * rho;
    let partial: f64 = (0..m).map(|i| offered.powi(i as i32) / factorial(i)).sum();
    let tail = offered.powi(m as i32) / (factorial(m) * (1.0 - rho));
    1.0 / (partial + tail)
}

/// Erlang-C probability that an arriving job has to queue.
pub fn queueing_probability(m: usize, rho: f64, p0: f64) -> f64 {
    let offered = m as f64 * rho;
    offered.powi(m as i32) / (factorial(m) * (1.0 - rho)) * p0
}

/// M/M/1 with mean service time `es`.
pub fn single_server(kind: CenterKind, name: &str, lambda: f64, es: f64) -> AnalyticalResult {
    let rho = lambda * es;
    if rho >= 1.0 {
        return AnalyticalResult::unstable(kind, name, lambda, rho, es);
    }
    let queue_time = rho * es / (1.0 - rho);
    let response_time = queue_time + es;
    AnalyticalResult {
        kind,
        name: name.to_string(),
        lambda,
        rho,
        queue_time,
        queue_population: queue_time * lambda,
        response_time,
        system_population: response_time * lambda,
        service_time: es,
    }
}

/// M/M/c with `servers` servers, each with mean service time `esi`.
pub fn multi_server(kind: CenterKind, name: &str, lambda: f64, esi: f64, servers: usize) -> AnalyticalResult {
    let es = esi / servers as f64;
    let rho = lambda * es;
    if rho >= 1.0 {
        return AnalyticalResult::unstable(kind, name, lambda, rho, esi);
    }
    let p0 = empty_probability(servers, rho);
    let pq = queueing_probability(servers, rho, p0);
    let queue_time = pq * es / (1.0 - rho);
    let response_time = queue_time + esi;
    AnalyticalResult {
        kind,
        name: name.to_string(),
        lambda,
        rho,
        queue_time,
        queue_population: queue_time * lambda,
        response_time,
        system_population: response_time * lambda,
        service_time: esi,
    }
}

/// M/M/∞: no queueing. ρ is the probability that at least one job is in service.
pub fn infinite_server(kind: CenterKind, name: &str, lambda: f64, es: f64) -> AnalyticalResult {
    let rho = 1.0 - (-lambda * es).exp();
    if rho >= 1.0 {
        return AnalyticalResult::unstable(kind, name, lambda, rho, es);
    }
    AnalyticalResult {
        kind,
        name: name.to_string(),
        lambda,
        rho,
        queue_time: 0.0,
        queue_population: 0.0,
        response_time: es,
        system_population: es * lambda,
        service_time: es,
    }
}

/// Analytical results for every simple center, assuming exponential service
/// and Poisson arrivals at each center's own rate.
///
/// Ride feedback makes the simple centers' input non-Poisson, so the ride
/// center and its feedback are not modelled.
pub fn analytical_results(config: &SimulationConfig) -> Vec<AnalyticalResult> {
    config
        .centers
        .iter()
        .map(|center| {
            let lambda = 1.0 / center.inter_arrival_time.unwrap_or(config.general.inter_arrival_time);
            if center.servers == 1 {
                single_server(center.kind, &center.name, lambda, center.mean_service_time)
            } else {
                multi_server(
                    center.kind,
                    &center.name,
                    lambda,
                    center.mean_service_time,
                    center.servers,
                )
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn mm1_textbook_values() {
        let r = single_server(CenterKind::Small, "Small", 1.0, 0.5);
        assert!(r.is_stable());
        assert!(close(r.rho, 0.5));
        assert!(close(r.queue_time, 0.5));
        assert!(close(r.response_time, 1.0));
        assert!(close(r.system_population, 1.0));
        assert!(close(r.queue_population, 0.5));
    }

    #[test]
    fn mmc_with_one_server_matches_mm1() {
        let one = multi_server(CenterKind::Small, "Small", 0.8, 1.0, 1);
        let mm1 = single_server(CenterKind::Small, "Small", 0.8, 1.0);
        assert!(close(one.response_time, mm1.response_time));
        assert!(close(one.queue_population, mm1.queue_population));
    }

    #[test]
    fn mm2_erlang_c() {
        // λ = 1, E[si] = 1.5, c = 2: ρ = 0.75, P0 = 1/7, Pq = 9/14.
        let r = multi_server(CenterKind::Medium, "Medium", 1.0, 1.5, 2);
        assert!(close(r.rho, 0.75));
        assert!(close(empty_probability(2, 0.75), 1.0 / 7.0));
        assert!(close(queueing_probability(2, 0.75, 1.0 / 7.0), 9.0 / 14.0));
        assert!(close(r.queue_time, (9.0 / 14.0) * 0.75 / 0.25));
        assert!(close(r.response_time, r.queue_time + 1.5));
    }

    #[test]
    fn saturated_center_diverges() {
        let r = single_server(CenterKind::Small, "Small", 2.0, 0.5);
        assert!(!r.is_stable());
        assert!(r.response_time.is_infinite());
        assert!(r.queue_population.is_infinite());
        assert_eq!(r.get(MetricIndex::Lambda), 2.0);
    }

    #[test]
    fn infinite_server_never_queues() {
        let r = infinite_server(CenterKind::Large, "Large", 2.0, 3.0);
        assert!(r.is_stable());
        assert_eq!(r.queue_time, 0.0);
        assert!(close(r.system_population, 6.0));
        assert!(close(r.rho, 1.0 - (-6.0f64).exp()));
    }

    #[test]
    fn default_network_is_stable() {
        let results = analytical_results(&SimulationConfig::default());
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(AnalyticalResult::is_stable));
        assert_eq!(results[1].kind, CenterKind::Medium);
    }
}
