//! Service-time, interarrival and seat-count distributions.
//!
//! Truncated distributions are sampled by inverse transform: one uniform draw
//! is mapped into `[F(lower), F(upper)]` and pushed through the inverse cdf.

use rand::Rng;
use rand_distr::{Distribution, Exp};

use crate::error::SimError;
use crate::rng::RngStreams;

#[derive(Debug, Clone, Copy)]
pub enum ServiceDistribution {
    Exponential { mean: f64, dist: Exp<f64> },
    /// Normal truncated to `[0, upper]`.
    TruncatedNormal { mean: f64, sigma: f64, upper: f64 },
    /// Log-normal with the given mean and standard deviation, truncated to `(0, upper]`.
    TruncatedLogNormal { mean: f64, sigma: f64, upper: f64 },
}

impl ServiceDistribution {
    pub fn exponential(mean: f64) -> Result<Self, SimError> {
        let dist = exp_with_mean(mean)?;
        Ok(Self::Exponential { mean, dist })
    }

    pub fn truncated_normal(mean: f64, sigma: f64, upper: f64) -> Result<Self, SimError> {
        validate_truncated(mean, sigma, upper)?;
        Ok(Self::TruncatedNormal { mean, sigma, upper })
    }

    pub fn truncated_log_normal(mean: f64, sigma: f64, upper: f64) -> Result<Self, SimError> {
        validate_truncated(mean, sigma, upper)?;
        Ok(Self::TruncatedLogNormal { mean, sigma, upper })
    }

    pub fn mean(&self) -> f64 {
        match *self {
            Self::Exponential { mean, .. }
            | Self::TruncatedNormal { mean, .. }
            | Self::TruncatedLogNormal { mean, .. } => mean,
        }
    }

    /// Draws one service time from `stream`.
    pub fn sample(&self, rngs: &mut RngStreams, stream: usize) -> f64 {
        rngs.select_stream(stream);
        Distribution::sample(self, rngs)
    }
}

impl Distribution<f64> for ServiceDistribution {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            Self::Exponential { dist, .. } => dist.sample(rng),
            Self::TruncatedNormal { mean, sigma, upper } => {
                let lo = normal_cdf((0.0 - mean) / sigma);
                let hi = normal_cdf((upper - mean) / sigma);
                let u = lo + (hi - lo) * rng.gen::<f64>();
                (mean + sigma * normal_idf(u)).clamp(0.0, upper)
            }
            Self::TruncatedLogNormal { mean, sigma, upper } => {
                let b = (1.0 + (sigma * sigma) / (mean * mean)).ln().sqrt();
                let a = mean.ln() - 0.5 * b * b;
                let lo = normal_cdf((1e-20_f64.ln() - a) / b);
                let hi = normal_cdf((upper.ln() - a) / b);
                let u = lo + (hi - lo) * rng.gen::<f64>();
                (a + b * normal_idf(u)).exp().clamp(0.0, upper)
            }
        }
    }
}

fn exp_with_mean(mean: f64) -> Result<Exp<f64>, SimError> {
    if !(mean > 0.0 && mean.is_finite()) {
        return Err(SimError::invalid_center(
            "distribution",
            format!("mean must be positive, got {mean}"),
        ));
    }
    Exp::new(1.0 / mean).map_err(|e| SimError::invalid_center("distribution", e.to_string()))
}

fn validate_truncated(mean: f64, sigma: f64, upper: f64) -> Result<(), SimError> {
    if !(mean > 0.0) {
        return Err(SimError::invalid_center(
            "distribution",
            format!("mean must be positive, got {mean}"),
        ));
    }
    if !(sigma > 0.0) {
        return Err(SimError::invalid_center(
            "distribution",
            format!("sigma must be positive, got {sigma}"),
        ));
    }
    if !(upper > 0.0) {
        return Err(SimError::invalid_center(
            "distribution",
            format!("truncation point must be positive, got {upper}"),
        ));
    }
    Ok(())
}

/// Exponential interarrival times drawn on a fixed stream.
#[derive(Debug, Clone, Copy)]
pub struct InterArrival {
    mean: f64,
    dist: Exp<f64>,
    stream: usize,
}

impl InterArrival {
    pub fn new(mean: f64, stream: usize) -> Result<Self, SimError> {
        Ok(Self {
            mean,
            dist: exp_with_mean(mean)?,
            stream,
        })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn sample(&self, rngs: &mut RngStreams) -> f64 {
        rngs.select_stream(self.stream);
        self.dist.sample(rngs)
    }
}

/// Number of seats asked for by a ride request: 1 (40%), 2 (30%), 3 (20%), 4 (10%).
pub fn sample_seats(rngs: &mut RngStreams, stream: usize) -> u32 {
    rngs.select_stream(stream);
    let r = rngs.random();
    if r < 0.4 {
        1
    } else if r < 0.7 {
        2
    } else if r < 0.9 {
        3
    } else {
        4
    }
}

/// Complementary error function, fractional error below 1.2e-7.
pub(crate) fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -z * z - 1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87 + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    let ans = t * poly.exp();
    if x >= 0.0 {
        ans
    } else {
        2.0 - ans
    }
}

/// Standard normal cdf.
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * erfc(-z / std::f64::consts::SQRT_2)
}

/// Standard normal inverse cdf (Acklam's rational approximation plus one Halley step).
pub fn normal_idf(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    const A: [f64; 6] = [
        -3.969_683_028_665_376e1,
        2.209_460_984_245_205e2,
        -2.759_285_104_469_687e2,
        1.383_577_518_672_69e2,
        -3.066_479_806_614_716e1,
        2.506_628_277_459_239,
    ];
    const B: [f64; 5] = [
        -5.447_609_879_822_406e1,
        1.615_858_368_580_409e2,
        -1.556_989_798_598_866e2,
        6.680_131_188_771_972e1,
        -1.328_068_155_288_572e1,
    ];
    const C: [f64; 6] = [
        -7.784_894_002_430_293e-3,
        -3.223_964_580_411_365e-1,
        -2.400_758_277_161_838,
        -2.549_732_539_343_734,
        4.374_664_141_464_968,
        2.938_163_982_698_783,
    ];
    const D: [f64; 4] = [
        7.784_695_709_041_462e-3,
        3.224_671_290_700_398e-1,
        2.445_134_137_142_996,
        3.754_408_661_907_416,
    ];
    const P_LOW: f64 = 0.024_25;

    let tail = |q: f64| {
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    };

    let x = if p < P_LOW {
        tail((-2.0 * p.ln()).sqrt())
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        -tail((-2.0 * (1.0 - p).ln()).sqrt())
    };

    let e = normal_cdf(x) - p;
    let u = e * (2.0 * std::f64::consts::PI).sqrt() * (x * x / 2.0).exp();
    x - u / (1.0 + x * u / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_mean(dist: ServiceDistribution, n: usize) -> f64 {
        let mut rngs = RngStreams::new(2024);
        (0..n).map(|_| dist.sample(&mut rngs, 0)).sum::<f64>() / n as f64
    }

    #[test]
    fn normal_cdf_and_idf_agree() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-7);
        assert!((normal_cdf(1.959_964) - 0.975).abs() < 1e-6);
        for p in [0.001, 0.02, 0.3, 0.5, 0.8, 0.99, 0.9999] {
            assert!((normal_cdf(normal_idf(p)) - p).abs() < 1e-6, "p = {p}");
        }
    }

    #[test]
    fn exponential_mean_matches() {
        let dist = ServiceDistribution::exponential(0.5).expect("valid mean");
        let mean = sample_mean(dist, 50_000);
        assert!((mean - 0.5).abs() < 0.02, "mean = {mean}");
    }

    #[test]
    fn truncated_normal_stays_in_bounds() {
        let dist = ServiceDistribution::truncated_normal(3.0, 2.0, 5.0).expect("valid");
        let mut rngs = RngStreams::new(7);
        for _ in 0..5_000 {
            let x = dist.sample(&mut rngs, 1);
            assert!((0.0..=5.0).contains(&x), "x = {x}");
        }
    }

    #[test]
    fn truncated_log_normal_is_positive_and_bounded() {
        let dist = ServiceDistribution::truncated_log_normal(10.0, 4.0, 30.0).expect("valid");
        let mut rngs = RngStreams::new(11);
        for _ in 0..5_000 {
            let x = dist.sample(&mut rngs, 2);
            assert!(x > 0.0 && x <= 30.0, "x = {x}");
        }
        let mean = sample_mean(dist, 20_000);
        assert!((mean - 10.0).abs() < 1.0, "mean = {mean}");
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(ServiceDistribution::exponential(0.0).is_err());
        assert!(ServiceDistribution::exponential(-1.0).is_err());
        assert!(ServiceDistribution::truncated_normal(1.0, 0.0, 2.0).is_err());
        assert!(ServiceDistribution::truncated_log_normal(1.0, 1.0, -2.0).is_err());
        assert!(InterArrival::new(0.0, 1).is_err());
    }

    #[test]
    fn seat_mix_follows_weights() {
        let mut rngs = RngStreams::new(3);
        let mut counts = [0usize; 4];
        let n = 40_000;
        for _ in 0..n {
            let seats = sample_seats(&mut rngs, 5);
            counts[(seats - 1) as usize] += 1;
        }
        let expected = [0.4, 0.3, 0.2, 0.1];
        for (count, p) in counts.iter().zip(expected) {
            let share = *count as f64 / n as f64;
            assert!((share - p).abs() < 0.015, "share = {share}, expected {p}");
        }
    }
}
