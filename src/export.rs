//! CSV export (§6): render a [`SimulationRun`] plus its owning project and
//! scenario names into the fixed CSV layout external tools consume.
//!
//! Deliberately decoupled from the numeric core: nothing here reaches a
//! [`crate::distributions::Distribution`] or [`crate::rng::SeededRng`],
//! mirroring the boundary between the engine and its export collaborator.

use crate::models::SimulationRun;
use crate::protocol::ENGINE_VERSION;

/// Render the fixed CSV export layout for `run` (§6).
pub fn render_csv(run: &SimulationRun, project_name: &str, scenario_name: &str) -> String {
    let mut rows: Vec<Vec<String>> = Vec::new();

    rows.push(vec!["# SPERT Scheduler".to_string()]);
    rows.push(vec!["# Project".to_string(), project_name.to_string()]);
    rows.push(vec!["# Scenario".to_string(), scenario_name.to_string()]);
    rows.push(vec!["# Trial Count".to_string(), run.trial_count.to_string()]);
    rows.push(vec!["# Seed".to_string(), run.seed.clone()]);
    rows.push(vec!["# Engine Version".to_string(), ENGINE_VERSION.to_string()]);
    rows.push(vec![
        "# Timestamp".to_string(),
        run.timestamp.to_rfc3339(),
    ]);
    rows.push(vec![String::new()]);

    rows.push(vec!["Statistic".to_string(), "Value".to_string()]);
    rows.push(vec!["Mean".to_string(), format_2dp(run.mean)]);
    rows.push(vec![
        "Standard Deviation".to_string(),
        format_2dp(run.standard_deviation),
    ]);
    rows.push(vec!["Min Sample".to_string(), format_2dp(run.min_sample)]);
    rows.push(vec!["Max Sample".to_string(), format_2dp(run.max_sample)]);
    rows.push(vec![String::new()]);

    rows.push(vec![
        "Percentile".to_string(),
        "Duration (days)".to_string(),
    ]);
    for (&rank, &value) in run.percentiles.iter() {
        rows.push(vec![format!("P{rank}"), format_2dp(value)]);
    }

    let lines: Vec<String> = rows.iter().map(|row| render_row(row)).collect();
    lines.join("\n")
}

fn format_2dp(value: f64) -> String {
    format!("{value:.2}")
}

/// Join `fields` with `,`, quoting per RFC 4180 any field containing `,`,
/// `"`, or a newline, and doubling embedded `"`.
fn render_row(fields: &[String]) -> String {
    fields
        .iter()
        .map(|field| render_field(field))
        .collect::<Vec<_>>()
        .join(",")
}

fn render_field(field: &str) -> String {
    let needs_quoting = field.contains(',') || field.contains('"') || field.contains('\n');
    if !needs_quoting {
        return field.to_string();
    }
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn sample_run() -> SimulationRun {
        let mut percentiles = BTreeMap::new();
        percentiles.insert(50, 27.3);
        percentiles.insert(95, 34.1);

        SimulationRun {
            id: "run-1".to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 1, 6, 12, 0, 0).unwrap(),
            trial_count: 50_000,
            seed: "demo".to_string(),
            engine_version: ENGINE_VERSION.to_string(),
            percentiles,
            histogram_bins: Vec::new(),
            mean: 27.004,
            standard_deviation: 4.512,
            min_sample: 12.0,
            max_sample: 45.0,
            samples: Vec::new(),
        }
    }

    #[test]
    fn csv_starts_with_the_banner_comment_lines() {
        let csv = render_csv(&sample_run(), "Website Relaunch", "Base Case");
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "# SPERT Scheduler");
        assert_eq!(lines[1], "# Project,Website Relaunch");
        assert_eq!(lines[2], "# Scenario,Base Case");
        assert_eq!(lines[3], "# Trial Count,50000");
        assert_eq!(lines[4], "# Seed,demo");
    }

    #[test]
    fn csv_has_no_trailing_newline() {
        let csv = render_csv(&sample_run(), "P", "S");
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn statistics_are_rounded_to_two_decimal_places() {
        let csv = render_csv(&sample_run(), "P", "S");
        assert!(csv.contains("Mean,27.00"));
        assert!(csv.contains("Standard Deviation,4.51"));
    }

    #[test]
    fn percentile_rows_are_present_and_ascending() {
        let csv = render_csv(&sample_run(), "P", "S");
        assert!(csv.contains("P50,27.30"));
        assert!(csv.contains("P95,34.10"));
        let p50_index = csv.find("P50").unwrap();
        let p95_index = csv.find("P95").unwrap();
        assert!(p50_index < p95_index);
    }

    #[test]
    fn fields_with_commas_or_quotes_are_quoted() {
        let csv = render_csv(&sample_run(), "Acme, Inc.", "Plan \"A\"");
        assert!(csv.contains("\"Acme, Inc.\""));
        assert!(csv.contains("\"Plan \"\"A\"\"\""));
    }
}
