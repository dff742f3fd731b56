//! SPERT Scheduler: a probabilistic project-scheduling engine.
//!
//! Turns a linearly ordered list of activities, each described by a
//! three-point estimate and a confidence level, into a deterministic
//! schedule, a Monte Carlo distribution of total project duration, a
//! statistical summary of that distribution, a schedule buffer, and
//! per-activity sensitivity rankings.

pub mod buffer;
pub mod calendar;
pub mod data_loader;
pub mod distributions;
pub mod error;
pub mod estimators;
pub mod export;
pub mod models;
pub mod protocol;
pub mod recommender;
pub mod reporter;
pub mod rng;
pub mod scheduler;
pub mod sensitivity;
pub mod simulation;
pub mod statistics;

pub use error::SpertError;
pub use models::{Activity, ActivityStatus, Project, Scenario, ScenarioSettings};
