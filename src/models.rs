//! The data model (§3): activities, scenario settings, the deterministic
//! schedule, and the Monte Carlo simulation run.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::Calendar;
use crate::distributions::DistributionType;
use crate::error::ValidationError;
use crate::estimators::ConfidenceLevel;
use crate::statistics::HistogramBin;

/// Where an activity sits in its lifecycle (§4.11). `Complete` is terminal;
/// reaching it requires `actual_duration` to be set, and clearing
/// `actual_duration` moves the activity back to `Planned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityStatus {
    Planned,
    InProgress,
    Complete,
}

/// A single project activity: a three-point estimate, a confidence level,
/// an optional standard-deviation override, a chosen distribution family,
/// and a lifecycle status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub min: f64,
    pub most_likely: f64,
    pub max: f64,
    pub confidence_level: ConfidenceLevel,
    pub sd_override: Option<f64>,
    pub distribution_type: DistributionType,
    pub status: ActivityStatus,
    pub actual_duration: Option<f64>,
}

impl Activity {
    /// Validate the invariants from §3: `min <= mostLikely <= max`, all
    /// nonnegative, a positive `sdOverride` when present, and a present
    /// nonnegative `actualDuration` when `status == Complete`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let path = format!("activity[{}]", self.id);

        for (label, value) in [
            ("min", self.min),
            ("mostLikely", self.most_likely),
            ("max", self.max),
        ] {
            if value < 0.0 {
                return Err(ValidationError::NegativeEstimate {
                    path: format!("{path}.{label}"),
                    value,
                });
            }
        }
        if self.min > self.most_likely {
            return Err(ValidationError::MinExceedsMostLikely {
                path: path.clone(),
                min: self.min,
                most_likely: self.most_likely,
            });
        }
        if self.most_likely > self.max {
            return Err(ValidationError::MostLikelyExceedsMax {
                path: path.clone(),
                most_likely: self.most_likely,
                max: self.max,
            });
        }
        if let Some(sd) = self.sd_override {
            if sd <= 0.0 {
                return Err(ValidationError::NonPositiveSdOverride {
                    path: format!("{path}.sdOverride"),
                    value: sd,
                });
            }
        }
        if self.status == ActivityStatus::Complete {
            match self.actual_duration {
                None => {
                    return Err(ValidationError::MissingActualDuration {
                        path: format!("{path}.actualDuration"),
                    });
                }
                Some(d) if d < 0.0 => {
                    return Err(ValidationError::NegativeActualDuration {
                        path: format!("{path}.actualDuration"),
                        value: d,
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// Scenario-wide settings (§3): trial count, RNG seed, and the two
/// percentile targets that drive the schedule and the buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSettings {
    pub trial_count: u32,
    pub rng_seed: String,
    pub probability_target: f64,
    pub project_probability_target: f64,
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        ScenarioSettings {
            trial_count: 50_000,
            rng_seed: "default-seed".to_string(),
            probability_target: 0.50,
            project_probability_target: 0.95,
        }
    }
}

impl ScenarioSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1_000..=500_000).contains(&self.trial_count) {
            return Err(ValidationError::TrialCountOutOfRange {
                path: "settings.trialCount".to_string(),
                value: self.trial_count,
            });
        }
        if self.rng_seed.is_empty() {
            return Err(ValidationError::EmptySeed {
                path: "settings.rngSeed".to_string(),
            });
        }
        for (label, value) in [
            ("probabilityTarget", self.probability_target),
            ("projectProbabilityTarget", self.project_probability_target),
        ] {
            if !(0.01..=0.99).contains(&value) {
                return Err(ValidationError::ProbabilityOutOfRange {
                    path: format!("settings.{label}"),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// One activity's place in a [`DeterministicSchedule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledActivity {
    pub activity_id: String,
    pub duration: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_actual: bool,
}

/// The deterministic, per-activity percentile schedule (§3, §4.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeterministicSchedule {
    pub activities: Vec<ScheduledActivity>,
    pub total_duration_days: u32,
    pub project_end_date: NaiveDate,
}

/// The result of one Monte Carlo run (§3, §6): summary statistics plus the
/// raw trial samples they were derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRun {
    pub id: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub trial_count: u32,
    pub seed: String,
    pub engine_version: String,
    pub percentiles: BTreeMap<u32, f64>,
    pub histogram_bins: Vec<HistogramBin>,
    pub mean: f64,
    pub standard_deviation: f64,
    pub min_sample: f64,
    pub max_sample: f64,
    pub samples: Vec<f64>,
}

/// A scenario: one ordered activity list plus the settings and optional
/// calendar used to evaluate it, and the last simulation run against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub activities: Vec<Activity>,
    pub settings: ScenarioSettings,
    pub calendar: Option<Calendar>,
    pub simulation_results: Option<SimulationRun>,
}

impl Scenario {
    /// Clone this scenario per Testable Property 9: a fresh scenario id,
    /// a fresh id for every retained activity, a rerolled (but
    /// deterministically derived) `rngSeed`, `simulationResults` dropped,
    /// and `startDate` plus all other settings preserved. When
    /// `drop_completed` is set, activities with `status == Complete` are
    /// dropped before ids are reassigned.
    pub fn clone_fresh(&self, new_id: &str, drop_completed: bool) -> Scenario {
        let activities: Vec<Activity> = self
            .activities
            .iter()
            .filter(|activity| !drop_completed || activity.status != ActivityStatus::Complete)
            .enumerate()
            .map(|(i, activity)| Activity {
                id: format!("{new_id}-activity-{i}"),
                ..activity.clone()
            })
            .collect();

        let mut settings = self.settings.clone();
        settings.rng_seed = reroll_seed(&self.settings.rng_seed, new_id);

        Scenario {
            id: new_id.to_string(),
            name: self.name.clone(),
            start_date: self.start_date,
            activities,
            settings,
            calendar: self.calendar.clone(),
            simulation_results: None,
        }
    }
}

/// Deterministically derive a new seed string from an existing one plus a
/// salt, so cloning stays reproducible rather than introducing real
/// randomness (§3 **[EXPANDED]**, Glossary: "scenario clone salt").
fn reroll_seed(original: &str, salt: &str) -> String {
    format!("{original}::clone::{salt}")
}

/// A project: an ordered list of scenarios under one name (§3
/// **[EXPANDED]**, §9's `Project -> Scenario -> Activity` ownership tree).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub scenarios: Vec<Scenario>,
}
