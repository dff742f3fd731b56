//! Load a scenario's activities from a CSV file (§3 data model, the teacher's
//! own `data_loader` concern, generalized from task/dependency records to
//! three-point estimate records).

use std::collections::HashMap;

use csv::Reader;
use serde::Deserialize;

use crate::distributions::DistributionType;
use crate::error::ValidationError;
use crate::estimators::ConfidenceLevel;
use crate::models::{Activity, ActivityStatus};

/// One row of the activities CSV. String-typed enum columns are parsed
/// after deserialization so a malformed value produces a [`ValidationError`]
/// with a field path, rather than a raw `csv` parse failure.
#[derive(Debug, Deserialize)]
struct ActivityRecord {
    id: String,
    name: String,
    min: f64,
    most_likely: f64,
    max: f64,
    confidence_level: String,
    sd_override: Option<f64>,
    distribution_type: String,
    status: String,
    actual_duration: Option<f64>,
}

/// Load activities from `path`, in file order (the order the scheduler and
/// simulation driver both treat as authoritative).
pub fn load_activities_from_csv(path: &str) -> Result<Vec<Activity>, Box<dyn std::error::Error>> {
    let mut reader = Reader::from_path(path)?;
    let mut activities = Vec::new();

    for result in reader.deserialize() {
        let record: ActivityRecord = result?;
        activities.push(activity_from_record(record)?);
    }

    Ok(activities)
}

fn activity_from_record(record: ActivityRecord) -> Result<Activity, ValidationError> {
    let confidence_level = parse_confidence_level(&record.id, &record.confidence_level)?;
    let distribution_type = parse_distribution_type(&record.id, &record.distribution_type)?;
    let status = parse_status(&record.id, &record.status)?;

    let activity = Activity {
        id: record.id,
        name: record.name,
        min: record.min,
        most_likely: record.most_likely,
        max: record.max,
        confidence_level,
        sd_override: record.sd_override,
        distribution_type,
        status,
        actual_duration: record.actual_duration,
    };
    activity.validate()?;
    Ok(activity)
}

fn parse_confidence_level(id: &str, value: &str) -> Result<ConfidenceLevel, ValidationError> {
    confidence_level_table()
        .get(value)
        .copied()
        .ok_or_else(|| ValidationError::UnrecognizedConfidenceLevel {
            path: format!("activity[{id}].confidenceLevel"),
            value: value.to_string(),
        })
}

fn confidence_level_table() -> HashMap<&'static str, ConfidenceLevel> {
    use ConfidenceLevel::*;
    HashMap::from([
        ("nearCertainty", NearCertainty),
        ("veryHighConfidence", VeryHighConfidence),
        ("highConfidence", HighConfidence),
        ("mediumHighConfidence", MediumHighConfidence),
        ("mediumConfidence", MediumConfidence),
        ("mediumLowConfidence", MediumLowConfidence),
        ("lowConfidence", LowConfidence),
        ("veryLowConfidence", VeryLowConfidence),
        ("extremelyLowConfidence", ExtremelyLowConfidence),
        ("guesstimate", Guesstimate),
    ])
}

fn parse_distribution_type(id: &str, value: &str) -> Result<DistributionType, ValidationError> {
    match value {
        "normal" => Ok(DistributionType::Normal),
        "logNormal" => Ok(DistributionType::LogNormal),
        "triangular" => Ok(DistributionType::Triangular),
        "uniform" => Ok(DistributionType::Uniform),
        other => Err(ValidationError::UnrecognizedDistributionType {
            path: format!("activity[{id}].distributionType"),
            value: other.to_string(),
        }),
    }
}

fn parse_status(id: &str, value: &str) -> Result<ActivityStatus, ValidationError> {
    match value {
        "planned" => Ok(ActivityStatus::Planned),
        "inProgress" => Ok(ActivityStatus::InProgress),
        "complete" => Ok(ActivityStatus::Complete),
        other => Err(ValidationError::UnrecognizedActivityStatus {
            path: format!("activity[{id}].status"),
            value: other.to_string(),
        }),
    }
}
