//! The sensitivity analyser (§4.9): per-activity variance contribution,
//! coefficient of variation, and 95th-quantile impact under a 10% scale-up
//! of the activity's three-point estimate.

use crate::distributions::from_three_point_estimate;
use crate::error::SpertError;
use crate::estimators::{self};
use crate::models::Activity;

/// One activity's contribution to overall schedule risk.
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityResult {
    pub activity_id: String,
    pub mean: f64,
    pub sd: f64,
    pub variance_contribution: f64,
    pub impact_score: f64,
    pub cv: f64,
}

/// The z-score for the 95th percentile of a standard normal distribution,
/// used as the fixed quantile multiplier for impact scoring (§4.9).
const Z_95: f64 = 1.645;

/// Rank every activity by its impact on the project's 95th-quantile
/// duration under a 10% scale-up of its own estimate, descending.
pub fn analyze_sensitivity(activities: &[Activity]) -> Result<Vec<SensitivityResult>, SpertError> {
    for activity in activities {
        activity.validate()?;
    }

    let moments: Vec<(f64, f64)> = activities
        .iter()
        .map(|activity| activity_mean_sd(activity))
        .collect::<Result<_, SpertError>>()?;

    let total_variance: f64 = moments.iter().map(|(_, sd)| sd * sd).sum();

    let mut results = Vec::with_capacity(activities.len());
    for (activity, &(mean, sd)) in activities.iter().zip(moments.iter()) {
        let variance = sd * sd;
        let variance_contribution = if total_variance > 0.0 {
            variance / total_variance
        } else {
            0.0
        };

        let scaled = scale_up_estimate(activity, 1.1);
        let (scaled_mean, scaled_sd) = activity_mean_sd(&scaled)?;

        let impact_score = (scaled_mean + Z_95 * scaled_sd) - (mean + Z_95 * sd);
        let cv = estimators::coefficient_of_variation(sd, mean);

        results.push(SensitivityResult {
            activity_id: activity.id.clone(),
            mean,
            sd,
            variance_contribution,
            impact_score,
            cv,
        });
    }

    results.sort_by(|a, b| {
        b.impact_score
            .partial_cmp(&a.impact_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(results)
}

/// The top `n` activities by impact score.
pub fn top_n(results: &[SensitivityResult], n: usize) -> Vec<SensitivityResult> {
    results.iter().take(n).cloned().collect()
}

fn activity_mean_sd(activity: &Activity) -> Result<(f64, f64), SpertError> {
    let mean = estimators::pert_mean(activity.min, activity.most_likely, activity.max);
    let sd = estimators::resolve_sd(
        activity.min,
        activity.max,
        activity.confidence_level,
        activity.sd_override,
    );
    // Constructing the distribution validates the three-point estimate
    // the same way the scheduler and the Monte Carlo driver do, so a
    // malformed activity fails sensitivity analysis the same way it fails
    // everywhere else.
    from_three_point_estimate(
        activity.distribution_type,
        activity.min,
        activity.most_likely,
        activity.max,
        activity.confidence_level,
        activity.sd_override,
    )?;
    Ok((mean, sd))
}

fn scale_up_estimate(activity: &Activity, factor: f64) -> Activity {
    Activity {
        min: activity.min * factor,
        most_likely: activity.most_likely * factor,
        max: activity.max * factor,
        sd_override: activity.sd_override.map(|sd| sd * factor),
        ..activity.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::DistributionType;
    use crate::estimators::ConfidenceLevel;
    use crate::models::ActivityStatus;

    fn activity(id: &str, min: f64, most_likely: f64, max: f64) -> Activity {
        Activity {
            id: id.to_string(),
            name: id.to_string(),
            min,
            most_likely,
            max,
            confidence_level: ConfidenceLevel::MediumConfidence,
            sd_override: None,
            distribution_type: DistributionType::Normal,
            status: ActivityStatus::Planned,
            actual_duration: None,
        }
    }

    #[test]
    fn variance_contributions_sum_to_one() {
        let activities = vec![
            activity("A1", 3.0, 5.0, 10.0),
            activity("A2", 10.0, 15.0, 25.0),
            activity("A3", 5.0, 7.0, 12.0),
        ];
        let results = analyze_sensitivity(&activities).unwrap();
        let total: f64 = results.iter().map(|r| r.variance_contribution).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn results_are_sorted_by_impact_descending() {
        let activities = vec![
            activity("A1", 3.0, 5.0, 10.0),
            activity("A2", 10.0, 15.0, 25.0),
            activity("A3", 5.0, 7.0, 12.0),
        ];
        let results = analyze_sensitivity(&activities).unwrap();
        for window in results.windows(2) {
            assert!(window[0].impact_score >= window[1].impact_score);
        }
    }

    #[test]
    fn the_widest_activity_has_the_largest_impact_score() {
        let activities = vec![
            activity("narrow", 9.0, 10.0, 11.0),
            activity("wide", 10.0, 15.0, 25.0),
        ];
        let results = analyze_sensitivity(&activities).unwrap();
        assert_eq!(results[0].activity_id, "wide");
    }

    #[test]
    fn top_n_truncates_to_requested_count() {
        let activities = vec![
            activity("A1", 3.0, 5.0, 10.0),
            activity("A2", 10.0, 15.0, 25.0),
            activity("A3", 5.0, 7.0, 12.0),
        ];
        let results = analyze_sensitivity(&activities).unwrap();
        assert_eq!(top_n(&results, 2).len(), 2);
    }

    #[test]
    fn zero_total_variance_yields_zero_contributions() {
        let activities = vec![activity("A1", 5.0, 5.0, 5.0)];
        let results = analyze_sensitivity(&activities).unwrap();
        assert_eq!(results[0].variance_contribution, 0.0);
    }
}
