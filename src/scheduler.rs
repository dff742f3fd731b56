//! The deterministic scheduler (§4.5): one schedule built from per-activity
//! percentile targets, with no randomness involved.

use chrono::NaiveDate;
use tracing::debug;

use crate::calendar::Calendar;
use crate::distributions::from_three_point_estimate;
use crate::error::SpertError;
use crate::models::{Activity, ActivityStatus, DeterministicSchedule, ScheduledActivity};

/// Build the deterministic schedule for `activities`, evaluated in order,
/// starting no earlier than `start_date`, at per-activity percentile `p`.
///
/// A completed activity with `actual_duration` set contributes that exact
/// duration and is flagged `is_actual`; every other activity is scheduled
/// at `round(inverseCDF(p))`, clamped to at least one day (§4.5).
pub fn build_schedule(
    activities: &[Activity],
    start_date: NaiveDate,
    p: f64,
    calendar: &Calendar,
) -> Result<DeterministicSchedule, SpertError> {
    for activity in activities {
        activity.validate()?;
    }

    let mut scheduled = Vec::with_capacity(activities.len());
    let mut previous_end: Option<NaiveDate> = None;
    let mut total_duration_days: u32 = 0;

    for activity in activities {
        let (duration, is_actual) = activity_duration_at(activity, p)?;

        let activity_start = match previous_end {
            None => calendar.add_working_days(start_date, 0),
            Some(end) => calendar.add_working_days(end, 1),
        };
        let activity_end = calendar.add_working_days(activity_start, duration.saturating_sub(1));

        debug!(
            activity_id = %activity.id,
            duration,
            start = %activity_start,
            end = %activity_end,
            "scheduled activity"
        );

        scheduled.push(ScheduledActivity {
            activity_id: activity.id.clone(),
            duration,
            start_date: activity_start,
            end_date: activity_end,
            is_actual,
        });

        total_duration_days += duration;
        previous_end = Some(activity_end);
    }

    let project_end_date = scheduled
        .last()
        .map(|a| a.end_date)
        .unwrap_or_else(|| calendar.add_working_days(start_date, 0));

    Ok(DeterministicSchedule {
        activities: scheduled,
        total_duration_days,
        project_end_date,
    })
}

/// `(duration_in_days, is_actual)` for a single activity at percentile `p`.
fn activity_duration_at(activity: &Activity, p: f64) -> Result<(u32, bool), SpertError> {
    if activity.status == ActivityStatus::Complete {
        if let Some(actual) = activity.actual_duration {
            return Ok((round_duration(actual).max(1), true));
        }
    }

    let distribution = from_three_point_estimate(
        activity.distribution_type,
        activity.min,
        activity.most_likely,
        activity.max,
        activity.confidence_level,
        activity.sd_override,
    )?;
    let days = distribution.inverse_cdf(p)?;
    Ok((round_duration(days).max(1), false))
}

/// Banker's rounding (round-half-to-even), consistent across the
/// schedule/buffer/percentile boundary per §9's rounding conventions.
fn round_duration(days: f64) -> u32 {
    days.round_ties_even().max(0.0) as u32
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
    fn schedule_starts_first_activity_on_the_given_start_date_when_working() {
        let activities = vec![activity("A1", 8.0, 10.0, 12.0)];
        let calendar = Calendar::new();
        let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(); // Monday
        let schedule = build_schedule(&activities, start, 0.5, &calendar).unwrap();
        assert_eq!(schedule.activities[0].start_date, start);
    }

    #[test]
    fn each_activity_starts_strictly_after_the_previous_ends() {
        let activities = vec![
            activity("A1", 3.0, 5.0, 10.0),
            activity("A2", 10.0, 15.0, 25.0),
            activity("A3", 5.0, 7.0, 12.0),
        ];
        let calendar = Calendar::new();
        let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let schedule = build_schedule(&activities, start, 0.5, &calendar).unwrap();

        for window in schedule.activities.windows(2) {
            assert!(window[1].start_date > window[0].end_date);
            assert!(calendar.is_working_day(window[1].start_date));
        }
        assert_eq!(
            schedule.project_end_date,
            schedule.activities.last().unwrap().end_date
        );
    }

    #[test]
    fn completed_activity_uses_actual_duration_not_a_sample() {
        let mut a1 = activity("A1", 8.0, 10.0, 12.0);
        a1.status = ActivityStatus::Complete;
        a1.actual_duration = Some(7.0);
        let calendar = Calendar::new();
        let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let schedule = build_schedule(&[a1], start, 0.5, &calendar).unwrap();
        assert_eq!(schedule.activities[0].duration, 7);
        assert!(schedule.activities[0].is_actual);
    }

    #[test]
    fn schedule_avoids_holidays_and_weekends() {
        let activities = vec![activity("A1", 3.0, 5.0, 10.0), activity("A2", 10.0, 15.0, 25.0)];
        let calendar = Calendar::with_holidays(crate::calendar::us_federal_holidays(2025));
        let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let schedule = build_schedule(&activities, start, 0.5, &calendar).unwrap();
        for scheduled in &schedule.activities {
            assert!(calendar.is_working_day(scheduled.start_date));
            assert!(calendar.is_working_day(scheduled.end_date));
        }
    }

    #[test]
    fn schedule_rejects_invalid_activities() {
        let bad = activity("A1", 12.0, 10.0, 8.0);
        let calendar = Calendar::new();
        let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        assert!(build_schedule(&[bad], start, 0.5, &calendar).is_err());
    }
}
