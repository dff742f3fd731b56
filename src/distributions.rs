//! The four parametric distributions the engine samples from (§4.2).
//!
//! Implemented as one tagged enum (`Distribution`) rather than a trait
//! object, per §9's "tagged variants (preferred)" guidance — there are only
//! four shapes and no host ever needs to add a fifth at runtime.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, NumericError};
use crate::estimators::{self, ConfidenceLevel};
use crate::rng::SeededRng;

/// How many rejection attempts a truncated-normal sample gets before the
/// engine gives up and clamps into range instead (§4.2).
const TRUNCATION_MAX_RETRIES: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Uniform {
    pub a: f64,
    pub b: f64,
}

impl Uniform {
    pub fn new(a: f64, b: f64) -> Result<Self, NumericError> {
        if a > b {
            return Err(NumericError::InvalidUniformBounds { a, b });
        }
        Ok(Uniform { a, b })
    }

    pub fn sample(&self, rng: &mut SeededRng) -> f64 {
        self.a + rng.next() * (self.b - self.a)
    }

    pub fn mean(&self) -> f64 {
        (self.a + self.b) / 2.0
    }

    pub fn variance(&self) -> f64 {
        (self.b - self.a).powi(2) / 12.0
    }

    pub fn inverse_cdf(&self, p: f64) -> Result<f64, DomainError> {
        require_unit_interval(p)?;
        Ok(self.a + p * (self.b - self.a))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangular {
    pub a: f64,
    pub c: f64,
    pub b: f64,
}

impl Triangular {
    pub fn new(a: f64, c: f64, b: f64) -> Result<Self, NumericError> {
        if !(a <= c && c <= b && a < b) {
            return Err(NumericError::InvalidTriangularBounds { a, c, b });
        }
        Ok(Triangular { a, c, b })
    }

    fn mode_cdf(&self) -> f64 {
        (self.c - self.a) / (self.b - self.a)
    }

    pub fn sample(&self, rng: &mut SeededRng) -> f64 {
        // inverseCDF(u) per §4.2.
        self.inverse_cdf(rng.next())
            .expect("rng.next() always yields p in [0, 1)")
    }

    pub fn mean(&self) -> f64 {
        (self.a + self.c + self.b) / 3.0
    }

    pub fn variance(&self) -> f64 {
        let (a, b, c) = (self.a, self.b, self.c);
        (a * a + b * b + c * c - a * b - a * c - b * c) / 18.0
    }

    pub fn inverse_cdf(&self, p: f64) -> Result<f64, DomainError> {
        require_unit_interval(p)?;
        let f_c = self.mode_cdf();
        let value = if p <= f_c {
            self.a + ((p * (self.b - self.a) * (self.c - self.a)).sqrt())
        } else {
            self.b - (((1.0 - p) * (self.b - self.a) * (self.b - self.c)).sqrt())
        };
        Ok(value)
    }
}

/// A normal distribution, optionally rejection-truncated to `[min, max]`.
/// When truncation is present the engine advertises it as *T-Normal* (§4.2,
/// Glossary).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Normal {
    pub mean: f64,
    pub sd: f64,
    pub truncation: Option<(f64, f64)>,
}

impl Normal {
    pub fn new(mean: f64, sd: f64) -> Result<Self, NumericError> {
        if sd < 0.0 {
            return Err(NumericError::NegativeSigma { sigma: sd });
        }
        Ok(Normal {
            mean,
            sd,
            truncation: None,
        })
    }

    pub fn truncated(mean: f64, sd: f64, min: f64, max: f64) -> Result<Self, NumericError> {
        let mut normal = Normal::new(mean, sd)?;
        normal.truncation = Some((min, max));
        Ok(normal)
    }

    fn raw_sample(&self, rng: &mut SeededRng) -> f64 {
        if self.sd == 0.0 {
            return self.mean;
        }
        let u1 = rng.next().max(f64::MIN_POSITIVE);
        let u2 = rng.next();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        self.mean + self.sd * z
    }

    pub fn sample(&self, rng: &mut SeededRng) -> f64 {
        let Some((min, max)) = self.truncation else {
            return self.raw_sample(rng);
        };
        for _ in 0..TRUNCATION_MAX_RETRIES {
            let v = self.raw_sample(rng);
            if v >= min && v <= max {
                return v;
            }
        }
        self.raw_sample(rng).clamp(min, max)
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn variance(&self) -> f64 {
        self.sd * self.sd
    }

    pub fn inverse_cdf(&self, p: f64) -> Result<f64, DomainError> {
        require_unit_interval(p)?;
        if self.sd == 0.0 {
            return Ok(self.mean);
        }
        Ok(self.mean + self.sd * standard_normal_inverse_cdf(p))
    }
}

/// Parametrized by the mean/sd of the *underlying* normal distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogNormal {
    pub mu: f64,
    pub sigma: f64,
}

impl LogNormal {
    pub fn new(mu: f64, sigma: f64) -> Result<Self, NumericError> {
        if sigma < 0.0 {
            return Err(NumericError::NegativeSigma { sigma });
        }
        Ok(LogNormal { mu, sigma })
    }

    /// Solve `(mu, sigma)` so the resulting lognormal has the requested
    /// arithmetic `mean` and `sd` (§4.2). Fails when `mean <= 0`.
    pub fn from_mean_sd(mean: f64, sd: f64) -> Result<Self, DomainError> {
        if mean <= 0.0 {
            return Err(DomainError::NonPositiveLogNormalMean { mean });
        }
        let sigma_sq = (1.0 + (sd * sd) / (mean * mean)).ln();
        let mu = mean.ln() - sigma_sq / 2.0;
        Ok(LogNormal {
            mu,
            sigma: sigma_sq.sqrt(),
        })
    }

    pub fn sample(&self, rng: &mut SeededRng) -> f64 {
        let underlying = Normal {
            mean: self.mu,
            sd: self.sigma,
            truncation: None,
        };
        underlying.raw_sample(rng).exp()
    }

    pub fn mean(&self) -> f64 {
        (self.mu + self.sigma * self.sigma / 2.0).exp()
    }

    pub fn variance(&self) -> f64 {
        let sigma_sq = self.sigma * self.sigma;
        (sigma_sq.exp() - 1.0) * (2.0 * self.mu + sigma_sq).exp()
    }

    pub fn inverse_cdf(&self, p: f64) -> Result<f64, DomainError> {
        require_unit_interval(p)?;
        Ok((self.mu + self.sigma * standard_normal_inverse_cdf(p)).exp())
    }
}

/// The kind of distribution an activity is configured to sample from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DistributionType {
    Normal,
    LogNormal,
    Triangular,
    Uniform,
}

/// A sampleable distribution, dispatched via a tagged variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Distribution {
    Uniform(Uniform),
    Triangular(Triangular),
    Normal(Normal),
    LogNormal(LogNormal),
}

impl Distribution {
    pub fn sample(&self, rng: &mut SeededRng) -> f64 {
        match self {
            Distribution::Uniform(d) => d.sample(rng),
            Distribution::Triangular(d) => d.sample(rng),
            Distribution::Normal(d) => d.sample(rng),
            Distribution::LogNormal(d) => d.sample(rng),
        }
    }

    pub fn mean(&self) -> f64 {
        match self {
            Distribution::Uniform(d) => d.mean(),
            Distribution::Triangular(d) => d.mean(),
            Distribution::Normal(d) => d.mean(),
            Distribution::LogNormal(d) => d.mean(),
        }
    }

    pub fn variance(&self) -> f64 {
        match self {
            Distribution::Uniform(d) => d.variance(),
            Distribution::Triangular(d) => d.variance(),
            Distribution::Normal(d) => d.variance(),
            Distribution::LogNormal(d) => d.variance(),
        }
    }

    pub fn inverse_cdf(&self, p: f64) -> Result<f64, DomainError> {
        match self {
            Distribution::Uniform(d) => d.inverse_cdf(p),
            Distribution::Triangular(d) => d.inverse_cdf(p),
            Distribution::Normal(d) => d.inverse_cdf(p),
            Distribution::LogNormal(d) => d.inverse_cdf(p),
        }
    }

    /// Parameters as a plain serializable snapshot, for diagnostics/export.
    pub fn parameters(&self) -> Self {
        *self
    }
}

/// Build the distribution for an activity's three-point estimate (§4.2).
///
/// `min`/`most_likely`/`max` are in working days; `sd_override`, when
/// `Some` and positive, bypasses the RSM-derived standard deviation.
pub fn from_three_point_estimate(
    distribution_type: DistributionType,
    min: f64,
    most_likely: f64,
    max: f64,
    confidence: ConfidenceLevel,
    sd_override: Option<f64>,
) -> Result<Distribution, NumericError> {
    let mean = estimators::pert_mean(min, most_likely, max);
    let sd = estimators::resolve_sd(min, max, confidence, sd_override);

    match distribution_type {
        DistributionType::Triangular => Ok(Distribution::Triangular(Triangular::new(
            min, most_likely, max,
        )?)),
        DistributionType::Uniform => Ok(Distribution::Uniform(Uniform::new(min, max)?)),
        DistributionType::Normal => Ok(Distribution::Normal(Normal::truncated(
            mean, sd, min, max,
        )?)),
        DistributionType::LogNormal => match LogNormal::from_mean_sd(mean, sd) {
            Ok(lognormal) => Ok(Distribution::LogNormal(lognormal)),
            Err(_) => Ok(Distribution::Normal(Normal::new(mean, sd)?)),
        },
    }
}

fn require_unit_interval(p: f64) -> Result<(), DomainError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(DomainError::ProbabilityOutOfBounds { p });
    }
    Ok(())
}

/// Acklam's rational approximation for the standard normal quantile
/// function (inverse CDF). Tail accuracy is approximately `1.15e-9`.
pub fn standard_normal_inverse_cdf(p: f64) -> f64 {
    // Coefficients from Peter Acklam's algorithm for computing the inverse
    // normal cumulative distribution function.
    const A: [f64; 6] = [
        -3.969_683_028_665_376e+01,
        2.209_460_984_245_205e+02,
        -2.759_285_104_469_687e+02,
        1.383_577_518_672_690e+02,
        -3.066_479_806_614_716e+01,
        2.506_628_277_459_239e+00,
    ];
    const B: [f64; 5] = [
        -5.447_609_879_822_406e+01,
        1.615_858_368_580_409e+02,
        -1.556_989_798_598_866e+02,
        6.680_131_188_771_972e+01,
        -1.328_068_155_288_572e+01,
    ];
    const C: [f64; 6] = [
        -7.784_894_002_430_293e-03,
        -3.223_964_580_411_365e-01,
        -2.400_758_277_161_838e+00,
        -2.549_732_539_343_734e+00,
        4.374_664_141_464_968e+00,
        2.938_163_982_698_783e+00,
    ];
    const D: [f64; 4] = [
        7.784_695_709_041_462e-03,
        3.224_671_290_700_398e-01,
        2.445_134_137_142_996e+00,
        3.754_408_661_907_416e+00,
    ];

    const P_LOW: f64 = 0.02425;
    let p_high = 1.0 - P_LOW;

    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= p_high {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}
