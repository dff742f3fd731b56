use std::collections::HashMap;
use std::error::Error;

use chrono::{Datelike, NaiveDate, Utc};
use clap::Parser;

use spert_scheduler::buffer::compute_buffer;
use spert_scheduler::calendar::{us_federal_holidays, Calendar};
use spert_scheduler::data_loader::load_activities_from_csv;
use spert_scheduler::error::ValidationError;
use spert_scheduler::export::render_csv;
use spert_scheduler::models::{ScenarioSettings, SimulationRun};
use spert_scheduler::protocol::ENGINE_VERSION;
use spert_scheduler::recommender::recommend_distribution;
use spert_scheduler::reporter::SimulationReporter;
use spert_scheduler::scheduler::build_schedule;
use spert_scheduler::sensitivity::analyze_sensitivity;
use spert_scheduler::simulation::run_trials;
use spert_scheduler::statistics::{
    compute_standard_percentiles, histogram, mean, sort_samples, standard_deviation,
};

/// Run the SPERT Scheduler demo: load activities from a CSV file, build the
/// deterministic schedule, run the Monte Carlo trial loop, and report the
/// results, buffer, sensitivity ranking, and distribution recommendations.
#[derive(Parser, Debug)]
#[command(name = "spert_scheduler", version = ENGINE_VERSION)]
struct Cli {
    /// Path to a CSV file of activities.
    #[arg(long, default_value = "project_data.csv")]
    input: String,

    /// Number of Monte Carlo trials.
    #[arg(long, default_value_t = 50_000)]
    trials: u32,

    /// RNG seed string.
    #[arg(long, default_value = "default-seed")]
    seed: String,

    /// Per-activity percentile target for the deterministic schedule.
    #[arg(long, default_value_t = 0.5)]
    activity_percentile: f64,

    /// Project-level percentile target for the schedule buffer.
    #[arg(long, default_value_t = 0.95)]
    project_percentile: f64,

    /// Schedule start date, ISO 8601 (YYYY-MM-DD).
    #[arg(long, default_value = "2025-01-06")]
    start_date: String,

    /// Observe US federal holidays for the schedule start year.
    #[arg(long, default_value_t = true)]
    us_holidays: bool,

    /// Write the simulation run as CSV to this path instead of stdout-only.
    #[arg(long)]
    csv_out: Option<String>,
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    tracing::info!(input = %cli.input, trials = cli.trials, "starting run");

    let settings = ScenarioSettings {
        trial_count: cli.trials,
        rng_seed: cli.seed.clone(),
        probability_target: cli.activity_percentile,
        project_probability_target: cli.project_percentile,
    };
    settings.validate()?;

    let activities = load_activities_from_csv(&cli.input)?;
    let start_date = NaiveDate::parse_from_str(&cli.start_date, "%Y-%m-%d").map_err(|_| {
        ValidationError::MalformedDate {
            path: "cli.startDate".to_string(),
            value: cli.start_date.clone(),
        }
    })?;

    let calendar = if cli.us_holidays {
        Calendar::with_holidays(us_federal_holidays(start_date.year()))
    } else {
        Calendar::new()
    };

    SimulationReporter::print_methodology(cli.trials, &cli.seed);

    let schedule = build_schedule(&activities, start_date, cli.activity_percentile, &calendar)?;
    SimulationReporter::print_loaded_activities(&schedule);

    SimulationReporter::print_simulation_progress();
    let overrides: HashMap<String, f64> = HashMap::new();
    let mut samples = run_trials(&activities, cli.trials, &cli.seed, &overrides, cli.trials / 10, |_, _| {})?;

    sort_samples(&mut samples);
    let run = SimulationRun {
        id: format!("run-{}", Utc::now().timestamp_millis()),
        timestamp: Utc::now(),
        trial_count: cli.trials,
        seed: cli.seed.clone(),
        engine_version: ENGINE_VERSION.to_string(),
        percentiles: compute_standard_percentiles(&samples)?,
        histogram_bins: histogram(&samples, 20),
        mean: mean(&samples),
        standard_deviation: standard_deviation(&samples),
        min_sample: samples[0],
        max_sample: samples[samples.len() - 1],
        samples,
    };
    SimulationReporter::print_results(&run);

    let buffer = compute_buffer(&schedule, &run, cli.project_percentile, &calendar);
    SimulationReporter::print_buffer(&buffer);

    let sensitivity = analyze_sensitivity(&activities)?;
    SimulationReporter::print_sensitivity(&sensitivity);

    for activity in &activities {
        let recommendation = recommend_distribution(
            activity.min,
            activity.most_likely,
            activity.max,
            activity.confidence_level,
        );
        SimulationReporter::print_recommendation(&activity.id, &recommendation);
    }

    if let Some(path) = &cli.csv_out {
        let csv = render_csv(&run, "Demo Project", "Base Case");
        std::fs::write(path, csv)?;
        println!("\n📄 CSV export written to {path}");
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => {
            println!();
            println!("✨ Run completed successfully!");
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Error: {e}");
            eprintln!();
            eprintln!("🔧 Troubleshooting:");
            eprintln!("   • Make sure the input CSV exists and matches the expected header.");
            eprintln!("   • Check that min <= mostLikely <= max for every activity.");
            Err(e)
        }
    }
}
