//! The schedule buffer (§4.8): the working-day gap between the
//! deterministic schedule's total duration and the Monte Carlo
//! distribution's project-level percentile target.

use chrono::NaiveDate;

use crate::calendar::Calendar;
use crate::models::{DeterministicSchedule, SimulationRun};

/// The buffer derived from a deterministic schedule and a simulation run.
/// `buffer_days` and `buffered_finish_date` are `None` when the requested
/// project percentile is absent from the run's stored percentile map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleBuffer {
    pub buffer_days: Option<u32>,
    pub buffered_finish_date: Option<NaiveDate>,
}

/// Compute the buffer for `schedule` against `run`, sized to close the gap
/// to `project_probability_target` (e.g. `0.95` for P95).
pub fn compute_buffer(
    schedule: &DeterministicSchedule,
    run: &SimulationRun,
    project_probability_target: f64,
    calendar: &Calendar,
) -> ScheduleBuffer {
    let rank = (project_probability_target * 100.0).round() as u32;
    let Some(&v_p) = run.percentiles.get(&rank) else {
        return ScheduleBuffer {
            buffer_days: None,
            buffered_finish_date: None,
        };
    };

    let target_days = v_p.round_ties_even() as i64;
    let buffer_days = (target_days - schedule.total_duration_days as i64).max(0) as u32;
    let buffered_finish_date = calendar.add_working_days(schedule.project_end_date, buffer_days);

    ScheduleBuffer {
        buffer_days: Some(buffer_days),
        buffered_finish_date: Some(buffered_finish_date),
    }
}
