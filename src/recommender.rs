//! The distribution recommender (§4.10): a decision tree from a three-point
//! estimate and confidence level to a suggested [`DistributionType`], with a
//! human-readable rationale.

use crate::distributions::DistributionType;
use crate::estimators::{self, ConfidenceLevel};

/// The skew-indicator threshold above which an estimate is considered
/// noticeably asymmetric (§4.10).
const SKEW_THRESHOLD: f64 = 0.1;

/// The coefficient-of-variation threshold above which an estimate is
/// considered noticeably spread out (§4.10).
const CV_THRESHOLD: f64 = 0.3;

/// A recommended distribution family plus the reasoning that led to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub distribution_type: DistributionType,
    pub rationale: String,
}

/// Recommend a distribution family for a three-point estimate (§4.10).
///
/// Evaluated in order: a degenerate estimate (`min == mostLikely == max`)
/// recommends Normal; an estimate with no distinct mode (`min == max` but
/// `mostLikely` differs, which cannot happen under [`Activity::validate`]
/// but is handled defensively, or `min == mostLikely` with `mostLikely != max`
/// or vice versa) recommends Uniform; a zero spread or non-positive mean
/// recommends Normal; low skew and low CV recommends Normal; high skew and
/// high CV recommends LogNormal; everything else recommends Triangular.
pub fn recommend_distribution(
    min: f64,
    most_likely: f64,
    max: f64,
    confidence: ConfidenceLevel,
) -> Recommendation {
    if min == most_likely && most_likely == max {
        return Recommendation {
            distribution_type: DistributionType::Normal,
            rationale: "min, most likely, and max are all equal; there is no uncertainty to \
                        shape, so a degenerate Normal is recommended."
                .to_string(),
        };
    }

    let has_distinct_mode = most_likely > min && most_likely < max;
    if !has_distinct_mode {
        return Recommendation {
            distribution_type: DistributionType::Uniform,
            rationale: "the most likely value sits on one of the bounds rather than strictly \
                        between them, so there is no distinct mode to anchor a triangular or \
                        normal shape; Uniform treats the range as equally likely throughout."
                .to_string(),
        };
    }

    let mean = estimators::pert_mean(min, most_likely, max);
    let sd = estimators::resolve_sd(min, max, confidence, None);

    if sd == 0.0 || mean == 0.0 {
        return Recommendation {
            distribution_type: DistributionType::Normal,
            rationale: "the resolved standard deviation or mean is zero, which would make a \
                        skew or coefficient-of-variation comparison meaningless; Normal is the \
                        safe default."
                .to_string(),
        };
    }

    let skew = estimators::skew_indicator(mean, most_likely, sd).abs();
    let cv = estimators::coefficient_of_variation(sd, mean);

    if skew < SKEW_THRESHOLD && cv < CV_THRESHOLD {
        return Recommendation {
            distribution_type: DistributionType::Normal,
            rationale: format!(
                "skew indicator {skew:.3} and coefficient of variation {cv:.3} are both low, \
                 so the estimate is close to symmetric and tightly bounded; Normal fits well."
            ),
        };
    }

    if skew >= SKEW_THRESHOLD && cv >= CV_THRESHOLD {
        return Recommendation {
            distribution_type: DistributionType::LogNormal,
            rationale: format!(
                "skew indicator {skew:.3} and coefficient of variation {cv:.3} are both high, \
                 suggesting a long right tail; LogNormal captures that asymmetry."
            ),
        };
    }

    Recommendation {
        distribution_type: DistributionType::Triangular,
        rationale: format!(
            "skew indicator {skew:.3} and coefficient of variation {cv:.3} disagree on whether \
             the estimate is symmetric or heavily tailed; Triangular is the balanced middle \
             ground."
        ),
    }
}
