//! The Monte Carlo driver (§4.6): run `N` independent trials, each summing
//! one sample per activity, streaming progress back through a callback.

use std::collections::HashMap;

use tracing::info;

use crate::distributions::{from_three_point_estimate, Distribution};
use crate::error::{SpertError, WorkerError};
use crate::models::{Activity, ActivityStatus};
use crate::rng::SeededRng;

/// How one activity contributes a duration to a trial: either a fixed
/// value (a completed activity, or a host-supplied override) or a draw
/// from its constructed distribution.
enum ActivitySampler {
    Fixed(f64),
    Distribution(Distribution),
}

impl ActivitySampler {
    fn sample(&self, rng: &mut SeededRng) -> f64 {
        match self {
            ActivitySampler::Fixed(value) => *value,
            ActivitySampler::Distribution(distribution) => distribution.sample(rng),
        }
    }
}

/// Build each activity's sampling function once, ahead of the trial loop
/// (§4.6). `deterministic_durations` overrides a planned activity's
/// distribution with a fixed value, by activity id.
///
/// An `inProgress` activity is sampled exactly like `planned` — its
/// `actualDuration`, if any, is ignored. Whether it should instead floor the
/// sampled duration is the open question from §9 and is left to product.
fn build_samplers(
    activities: &[Activity],
    deterministic_durations: &HashMap<String, f64>,
) -> Result<Vec<ActivitySampler>, SpertError> {
    activities
        .iter()
        .map(|activity| {
            if let Some(&fixed) = deterministic_durations.get(&activity.id) {
                return Ok(ActivitySampler::Fixed(fixed));
            }
            if activity.status == ActivityStatus::Complete {
                return activity
                    .actual_duration
                    .map(ActivitySampler::Fixed)
                    .ok_or_else(|| {
                        WorkerError::MissingSampler {
                            activity_id: activity.id.clone(),
                        }
                        .into()
                    });
            }
            let distribution = from_three_point_estimate(
                activity.distribution_type,
                activity.min,
                activity.most_likely,
                activity.max,
                activity.confidence_level,
                activity.sd_override,
            )?;
            Ok(ActivitySampler::Distribution(distribution))
        })
        .collect()
}

/// Run `trial_count` independent trials over `activities`, seeded from
/// `seed`. The RNG is consumed in activity-major order within each trial,
/// so identical inputs and seed always yield bit-identical `samples[i]`
/// (§4.6's determinism requirement).
///
/// `on_progress(completed, total)` is invoked every `progress_interval`
/// completed trials, plus once more at the very end.
pub fn run_trials<F: FnMut(u32, u32)>(
    activities: &[Activity],
    trial_count: u32,
    seed: &str,
    deterministic_durations: &HashMap<String, f64>,
    progress_interval: u32,
    mut on_progress: F,
) -> Result<Vec<f64>, SpertError> {
    for activity in activities {
        activity.validate()?;
    }

    let samplers = build_samplers(activities, deterministic_durations)?;
    let mut rng = SeededRng::new(seed);
    let mut samples = vec![0.0_f64; trial_count as usize];

    for (trial_index, sample_slot) in samples.iter_mut().enumerate() {
        let mut total = 0.0;
        for sampler in &samplers {
            total += sampler.sample(&mut rng);
        }
        *sample_slot = total;

        let completed = (trial_index + 1) as u32;
        if progress_interval > 0 && completed % progress_interval == 0 {
            on_progress(completed, trial_count);
        }
    }

    on_progress(trial_count, trial_count);
    info!(trial_count, seed, "monte carlo trial loop finished");
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::DistributionType;
    use crate::estimators::ConfidenceLevel;

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
    fn identical_inputs_and_seed_produce_bit_identical_samples() {
        let activities = vec![activity("A1", 8.0, 10.0, 12.0)];
        let overrides = HashMap::new();
        let run = |seed: &str| {
            run_trials(&activities, 200, seed, &overrides, 0, |_, _| {}).unwrap()
        };
        assert_eq!(run("seed-x"), run("seed-x"));
    }

    #[test]
    fn different_seeds_produce_different_samples() {
        let activities = vec![activity("A1", 8.0, 10.0, 12.0)];
        let overrides = HashMap::new();
        let a = run_trials(&activities, 200, "seed-a", &overrides, 0, |_, _| {}).unwrap();
        let b = run_trials(&activities, 200, "seed-b", &overrides, 0, |_, _| {}).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn sample_count_matches_trial_count() {
        let activities = vec![activity("A1", 8.0, 10.0, 12.0)];
        let overrides = HashMap::new();
        let samples = run_trials(&activities, 1234, "count", &overrides, 0, |_, _| {}).unwrap();
        assert_eq!(samples.len(), 1234);
    }

    #[test]
    fn completed_activity_contributes_a_constant() {
        let mut a1 = activity("A1", 8.0, 10.0, 12.0);
        a1.status = ActivityStatus::Complete;
        a1.actual_duration = Some(11.0);
        let overrides = HashMap::new();
        let samples = run_trials(&[a1], 500, "constant", &overrides, 0, |_, _| {}).unwrap();
        assert!(samples.iter().all(|&v| v == 11.0));
    }

    #[test]
    fn deterministic_override_replaces_sampling() {
        let a1 = activity("A1", 8.0, 10.0, 12.0);
        let mut overrides = HashMap::new();
        overrides.insert("A1".to_string(), 9.5);
        let samples = run_trials(&[a1], 500, "override", &overrides, 0, |_, _| {}).unwrap();
        assert!(samples.iter().all(|&v| v == 9.5));
    }

    #[test]
    fn progress_callback_fires_at_each_interval_and_at_the_end() {
        let activities = vec![activity("A1", 8.0, 10.0, 12.0)];
        let overrides = HashMap::new();
        let mut seen = Vec::new();
        run_trials(&activities, 25, "progress", &overrides, 10, |done, total| {
            seen.push((done, total));
        })
        .unwrap();
        assert_eq!(seen, vec![(10, 25), (20, 25), (25, 25)]);
    }

    #[test]
    fn sum_of_three_activities_converges_near_pert_mean_sum() {
        let activities = vec![
            activity("A1", 3.0, 5.0, 10.0),
            activity("A2", 10.0, 15.0, 25.0),
            activity("A3", 5.0, 7.0, 12.0),
        ];
        let overrides = HashMap::new();
        let samples = run_trials(&activities, 50_000, "demo", &overrides, 0, |_, _| {}).unwrap();
        let mean: f64 = samples.iter().sum::<f64>() / samples.len() as f64;
        assert!((mean - 27.0).abs() < 1.0, "mean {mean} too far from ~27");
    }
}
