//! Human-facing console reporting for the demonstration CLI. Kept in the
//! teacher's banner/emoji `println!` style — the trial loop and scheduler
//! themselves report through `tracing`, not through this module.

use crate::buffer::ScheduleBuffer;
use crate::models::{DeterministicSchedule, SimulationRun};
use crate::recommender::Recommendation;
use crate::sensitivity::SensitivityResult;

pub struct SimulationReporter;

impl SimulationReporter {
    pub fn print_methodology(trial_count: u32, seed: &str) {
        println!("🎯 SPERT SCHEDULER");
        println!("════════════════════════════════════");
        println!();
        println!("📘 CALCULATION METHODOLOGY:");
        println!("Each activity's three-point estimate (min, most likely, max) and confidence");
        println!("level are turned into a distribution (normal, lognormal, triangular, or");
        println!("uniform). The deterministic schedule evaluates each activity at its target");
        println!("percentile; the Monte Carlo driver then draws {trial_count} independent trials,");
        println!("summing one sample per activity per trial, seeded with \"{seed}\".");
        println!();
    }

    pub fn print_loaded_activities(schedule: &DeterministicSchedule) {
        println!("📋 Deterministic Schedule:");
        for scheduled in &schedule.activities {
            let marker = if scheduled.is_actual { "✅" } else { "•" };
            println!(
                "   {marker} {} — {} day(s), {} → {}",
                scheduled.activity_id, scheduled.duration, scheduled.start_date, scheduled.end_date
            );
        }
        println!(
            "   Total: {} days, finishing {}",
            schedule.total_duration_days, schedule.project_end_date
        );
        println!();
    }

    pub fn print_simulation_progress() {
        println!("⚡ Running Monte Carlo trials...");
    }

    pub fn print_results(run: &SimulationRun) {
        println!();
        println!("📈 SIMULATION RESULTS");
        println!("════════════════════════════════════");
        Self::print_basic_statistics(run);
        Self::print_percentiles(run);
    }

    fn print_basic_statistics(run: &SimulationRun) {
        println!("🎯 Basic Statistics ({} trials, seed \"{}\"):", run.trial_count, run.seed);
        println!("   • Mean:               {:.2} days", run.mean);
        println!("   • Standard Deviation: {:.2} days", run.standard_deviation);
        println!("   • Min Sample:         {:.2} days", run.min_sample);
        println!("   • Max Sample:         {:.2} days", run.max_sample);
        println!();
    }

    fn print_percentiles(run: &SimulationRun) {
        println!("🎲 Percentiles:");
        for (&rank, &value) in run.percentiles.iter() {
            println!("   • P{rank}: {value:.2} days");
        }
        println!();
    }

    pub fn print_buffer(buffer: &ScheduleBuffer) {
        println!("📋 Schedule Buffer:");
        match (buffer.buffer_days, buffer.buffered_finish_date) {
            (Some(days), Some(finish)) => {
                println!("   • Buffer:         +{days} working day(s)");
                println!("   • Buffered finish: {finish}");
            }
            _ => println!("   • Buffer unavailable: requested project percentile has no recorded rank."),
        }
        println!();
    }

    pub fn print_sensitivity(results: &[SensitivityResult]) {
        println!("⚠️  Sensitivity Ranking (highest impact first):");
        for result in results {
            println!(
                "   • {}: impact {:+.2}, variance share {:.1}%, CV {:.2}",
                result.activity_id,
                result.impact_score,
                result.variance_contribution * 100.0,
                result.cv
            );
        }
        println!();
    }

    pub fn print_recommendation(activity_id: &str, recommendation: &Recommendation) {
        println!(
            "💡 {activity_id}: recommend {:?} — {}",
            recommendation.distribution_type, recommendation.rationale
        );
    }
}
