//! SPERT/PERT estimators (§4.3): derive mean, standard deviation, a skew
//! indicator and a coefficient of variation from a three-point estimate and
//! a confidence level.

use serde::{Deserialize, Serialize};

/// The ten-rung confidence ladder (§3, §4.2). Each rung maps to a fixed
/// relative spread multiplier (RSM) via [`ConfidenceLevel::rsm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConfidenceLevel {
    NearCertainty,
    VeryHighConfidence,
    HighConfidence,
    MediumHighConfidence,
    MediumConfidence,
    MediumLowConfidence,
    LowConfidence,
    VeryLowConfidence,
    ExtremelyLowConfidence,
    Guesstimate,
}

impl ConfidenceLevel {
    /// The relative spread multiplier (`sqrt(k) / 10`) for this rung.
    pub fn rsm(self) -> f64 {
        match self {
            ConfidenceLevel::NearCertainty => 0.0707,
            ConfidenceLevel::VeryHighConfidence => 0.1,
            ConfidenceLevel::HighConfidence => 0.1414,
            ConfidenceLevel::MediumHighConfidence => 0.1732,
            ConfidenceLevel::MediumConfidence => 0.2,
            ConfidenceLevel::MediumLowConfidence => 0.2345,
            ConfidenceLevel::LowConfidence => 0.2739,
            ConfidenceLevel::VeryLowConfidence => 0.3162,
            ConfidenceLevel::ExtremelyLowConfidence => 0.3536,
            ConfidenceLevel::Guesstimate => 0.4062,
        }
    }
}

/// The PERT weighted mean `(min + 4*mostLikely + max) / 6`.
pub fn pert_mean(min: f64, most_likely: f64, max: f64) -> f64 {
    (min + 4.0 * most_likely + max) / 6.0
}

/// Resolve a standard deviation: `sdOverride` wins when present and
/// positive, otherwise `RSM(confidence) * (max - min)`.
pub fn resolve_sd(min: f64, max: f64, confidence: ConfidenceLevel, sd_override: Option<f64>) -> f64 {
    match sd_override {
        Some(sd) if sd > 0.0 => sd,
        _ => confidence.rsm() * (max - min),
    }
}

/// `(mean - mostLikely) / sd`, or `0` when `sd <= 0`.
pub fn skew_indicator(mean: f64, most_likely: f64, sd: f64) -> f64 {
    if sd > 0.0 {
        (mean - most_likely) / sd
    } else {
        0.0
    }
}

/// Coefficient of variation `sd / mean`, or `0` when `mean <= 0`.
pub fn coefficient_of_variation(sd: f64, mean: f64) -> f64 {
    if mean > 0.0 {
        sd / mean
    } else {
        0.0
    }
}
