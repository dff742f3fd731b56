//! End-to-end scenarios exercising the scheduler, Monte Carlo driver,
//! statistics pass, and schedule buffer together.

use std::collections::HashMap;

use chrono::NaiveDate;

use spert_scheduler::buffer::compute_buffer;
use spert_scheduler::calendar::{us_federal_holidays, Calendar};
use spert_scheduler::distributions::DistributionType;
use spert_scheduler::estimators::ConfidenceLevel;
use spert_scheduler::models::{Activity, ActivityStatus};
use spert_scheduler::recommender::recommend_distribution;
use spert_scheduler::scheduler::build_schedule;
use spert_scheduler::simulation::run_trials;
use spert_scheduler::statistics::{compute_standard_percentiles, histogram, mean, sort_samples};

fn activity(id: &str, min: f64, most_likely: f64, max: f64, distribution: DistributionType) -> Activity {
    Activity {
        id: id.to_string(),
        name: id.to_string(),
        min,
        most_likely,
        max,
        confidence_level: ConfidenceLevel::MediumConfidence,
        sd_override: None,
        distribution_type: distribution,
        status: ActivityStatus::Planned,
        actual_duration: None,
    }
}

fn three_activity_project() -> Vec<Activity> {
    vec![
        activity("A1", 3.0, 5.0, 10.0, DistributionType::Normal),
        activity("A2", 10.0, 15.0, 25.0, DistributionType::Normal),
        activity("A3", 5.0, 7.0, 12.0, DistributionType::Normal),
    ]
}

/// Scenario A: one normal activity, 10 000 trials.
#[test]
fn scenario_a_single_normal_activity() {
    let activities = vec![activity("A1", 8.0, 10.0, 12.0, DistributionType::Normal)];
    let overrides = HashMap::new();
    let mut samples = run_trials(&activities, 10_000, "A", &overrides, 0, |_, _| {}).unwrap();
    sort_samples(&mut samples);

    let m = mean(&samples);
    assert!((m - 10.0).abs() < 0.1, "mean {m} too far from 10");
    assert!(samples[0] >= 8.0 - 1e-9);
    assert!(samples[samples.len() - 1] <= 12.0 + 1e-9);

    let percentiles = compute_standard_percentiles(&samples).unwrap();
    assert!((percentiles[&50] - 10.0).abs() < 0.5);
}

/// Scenario B: one triangular activity, samples strictly bounded.
#[test]
fn scenario_b_single_triangular_activity() {
    let activities = vec![activity("A1", 8.0, 10.0, 12.0, DistributionType::Triangular)];
    let overrides = HashMap::new();
    let mut samples = run_trials(&activities, 10_000, "A", &overrides, 0, |_, _| {}).unwrap();
    sort_samples(&mut samples);

    let m = mean(&samples);
    assert!((m - 10.0).abs() < 0.2, "mean {m} too far from 10");
    assert!(samples.iter().all(|&v| v >= 8.0 && v <= 12.0));
}

/// Scenario C: three normal activities, 50 000 trials, seed "demo".
#[test]
fn scenario_c_three_activity_project() {
    let activities = three_activity_project();
    let overrides = HashMap::new();
    let mut samples = run_trials(&activities, 50_000, "demo", &overrides, 0, |_, _| {}).unwrap();
    sort_samples(&mut samples);

    let m = mean(&samples);
    assert!((m - 27.0).abs() < 1.0, "mean {m} too far from 27");

    let percentiles = compute_standard_percentiles(&samples).unwrap();
    assert!(percentiles[&95] > m);

    let bins = histogram(&samples, 20);
    let total: u32 = bins.iter().map(|b| b.count).sum();
    assert_eq!(total, 50_000);
}

/// Scenario D: deterministic schedule of C at p=0.5, starting Monday
/// 2025-01-06, observing US federal holidays for 2025.
#[test]
fn scenario_d_deterministic_schedule_avoids_weekends_and_holidays() {
    let activities = three_activity_project();
    let calendar = Calendar::with_holidays(us_federal_holidays(2025));
    let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();

    let schedule = build_schedule(&activities, start, 0.5, &calendar).unwrap();

    assert_eq!(schedule.activities[0].start_date, start);
    for scheduled in &schedule.activities {
        assert!(calendar.is_working_day(scheduled.start_date));
        assert!(calendar.is_working_day(scheduled.end_date));
    }
    for window in schedule.activities.windows(2) {
        assert!(window[1].start_date > window[0].end_date);
    }
}

/// Scenario E: buffer for C with activity target P50 and project target
/// P95.
#[test]
fn scenario_e_buffer_closes_the_gap_to_p95() {
    let activities = three_activity_project();
    let calendar = Calendar::new();
    let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();

    let schedule = build_schedule(&activities, start, 0.5, &calendar).unwrap();

    let overrides = HashMap::new();
    let mut samples = run_trials(&activities, 50_000, "demo", &overrides, 0, |_, _| {}).unwrap();
    sort_samples(&mut samples);
    let percentiles = compute_standard_percentiles(&samples).unwrap();
    let p95 = percentiles[&95];

    let run = spert_scheduler::models::SimulationRun {
        id: "run-e".to_string(),
        timestamp: chrono::Utc::now(),
        trial_count: 50_000,
        seed: "demo".to_string(),
        engine_version: "1.0.0".to_string(),
        percentiles,
        histogram_bins: Vec::new(),
        mean: mean(&samples),
        standard_deviation: 0.0,
        min_sample: samples[0],
        max_sample: samples[samples.len() - 1],
        samples,
    };

    let buffer = compute_buffer(&schedule, &run, 0.95, &calendar);
    let expected_buffer_days = (p95.round_ties_even() as i64 - schedule.total_duration_days as i64).max(0) as u32;
    assert_eq!(buffer.buffer_days, Some(expected_buffer_days));
    assert!(buffer.buffered_finish_date.unwrap() >= schedule.project_end_date);
}

/// Scenario F: the recommender picks lognormal for a strongly skewed,
/// wide estimate.
#[test]
fn scenario_f_recommender_picks_lognormal_for_skewed_estimate() {
    let recommendation =
        recommend_distribution(2.0, 5.0, 30.0, ConfidenceLevel::MediumConfidence);
    assert_eq!(recommendation.distribution_type, DistributionType::LogNormal);
}
