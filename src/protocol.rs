//! Wire and export envelope shapes (§6): the host/worker simulation
//! protocol and the persisted project export envelope. Plain `serde`
//! types only — no distribution, RNG, or sampling type is reachable from
//! this module, so a host can serialize these over whatever transport it
//! chooses.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{Activity, Project, SimulationRun};

/// Informational engine version string, reported in every [`SimulationRun`]
/// and CSV export header.
pub const ENGINE_VERSION: &str = "1.0.0";

/// Schema version of the persisted export envelope, used for migration
/// dispatch on import.
pub const SCHEMA_VERSION: u32 = 1;

/// The literal `format` discriminator every export envelope must carry.
pub const EXPORT_FORMAT: &str = "spert-scheduler-export";

/// Payload of a `simulation:start` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationStartPayload {
    pub activities: Vec<Activity>,
    pub trial_count: u32,
    pub rng_seed: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deterministic_durations: Option<HashMap<String, f64>>,
}

/// Payload of a `simulation:progress` notification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationProgressPayload {
    pub completed_trials: u32,
    pub total_trials: u32,
}

/// Payload of a `simulation:result` message: the run plus wall-clock time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResultPayload {
    #[serde(flatten)]
    pub run: SimulationRun,
    pub elapsed_ms: u64,
}

/// Payload of a `simulation:error` message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationErrorPayload {
    pub message: String,
}

/// The host/worker simulation message envelope (§6), tagged by `type` with
/// the payload under `payload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum SimulationMessage {
    #[serde(rename = "simulation:start")]
    Start(SimulationStartPayload),
    #[serde(rename = "simulation:progress")]
    Progress(SimulationProgressPayload),
    #[serde(rename = "simulation:result")]
    Result(SimulationResultPayload),
    #[serde(rename = "simulation:error")]
    Error(SimulationErrorPayload),
}

/// The persisted export envelope (§6). `format` MUST be [`EXPORT_FORMAT`];
/// [`ExportEnvelope::verify_format`] is how an importer checks this before
/// trusting the rest of the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    pub format: String,
    pub app_version: String,
    pub exported_at: chrono::DateTime<chrono::Utc>,
    pub schema_version: u32,
    pub projects: Vec<Project>,
}

/// Raised when an import is attempted on an envelope with the wrong
/// `format` discriminator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("expected export format '{expected}', got '{actual}'")]
pub struct UnrecognizedExportFormat {
    pub expected: String,
    pub actual: String,
}

impl ExportEnvelope {
    pub fn new(app_version: String, exported_at: chrono::DateTime<chrono::Utc>, projects: Vec<Project>) -> Self {
        ExportEnvelope {
            format: EXPORT_FORMAT.to_string(),
            app_version,
            exported_at,
            schema_version: SCHEMA_VERSION,
            projects,
        }
    }

    /// Reject any envelope whose `format` is not the literal [`EXPORT_FORMAT`]
    /// string (§6: "Importers MUST verify the literal `format` string and
    /// reject otherwise").
    pub fn verify_format(&self) -> Result<(), UnrecognizedExportFormat> {
        if self.format != EXPORT_FORMAT {
            return Err(UnrecognizedExportFormat {
                expected: EXPORT_FORMAT.to_string(),
                actual: self.format.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulation_message_round_trips_through_json() {
        let msg = SimulationMessage::Progress(SimulationProgressPayload {
            completed_trials: 100,
            total_trials: 1000,
        });
        let json = serde_json::to_string(&msg).unwrap();
        let parsed: SimulationMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, msg);
    }

    #[test]
    fn export_envelope_carries_the_literal_format_string() {
        let envelope = ExportEnvelope::new("1.0.0".to_string(), chrono::Utc::now(), Vec::new());
        assert_eq!(envelope.format, EXPORT_FORMAT);
        assert!(envelope.verify_format().is_ok());
    }

    #[test]
    fn verify_format_rejects_an_unrecognized_envelope() {
        let mut envelope = ExportEnvelope::new("1.0.0".to_string(), chrono::Utc::now(), Vec::new());
        envelope.format = "something-else".to_string();
        assert!(envelope.verify_format().is_err());
    }

    #[test]
    fn export_envelope_round_trips_through_json() {
        let envelope = ExportEnvelope::new("1.0.0".to_string(), chrono::Utc::now(), Vec::new());
        let json = serde_json::to_string(&envelope).unwrap();
        let parsed: ExportEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, envelope);
    }
}
