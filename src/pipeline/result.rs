// src/pipeline/result.rs

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dispatch::result::serialize_secs;
use crate::dispatch::DispatchOutcome;
use crate::errors::ExitClass;
use crate::types::PipelineKind;

/// One phase as it actually ran.
#[derive(Debug, Clone, Serialize)]
pub struct PipelinePhaseResult {
    pub phase: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_secs")]
    pub duration: Duration,
    pub success: bool,
    /// Per-target detail.
    pub outcome: DispatchOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub kind: PipelineKind,
    /// Only phases that were started; a failed phase is the last entry.
    pub phases: Vec<PipelinePhaseResult>,
    pub success: bool,
    pub cancelled: bool,
    #[serde(serialize_with = "serialize_secs")]
    pub duration: Duration,
}

impl PipelineResult {
    pub fn failed_phase(&self) -> Option<&PipelinePhaseResult> {
        self.phases.iter().find(|p| !p.success)
    }

    pub fn exit_class(&self) -> ExitClass {
        if self.success {
            ExitClass::Success
        } else {
            ExitClass::Runtime
        }
    }
}
