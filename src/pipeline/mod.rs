// src/pipeline/mod.rs

//! CI pipeline: a fixed sequence of phases, each an all-targets dispatch.
//!
//! The first phase whose dispatch fails halts the pipeline. Continue-on-error
//! only applies inside a phase.

pub mod result;

use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};

use crate::dispatch::{DispatchRequest, Dispatcher};
use crate::errors::Result;
use crate::exec::Executor;
use crate::types::{PipelineKind, TargetType};

pub use result::{PipelinePhaseResult, PipelineResult};

pub const STANDARD_PHASES: [&str; 5] = ["clean", "restore", "check", "build", "test"];
pub const RELEASE_PHASES: [&str; 5] = ["clean", "restore", "check", "build:release", "test"];

/// Where a pipeline run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    NotStarted,
    /// Running the phase at this index.
    Running(usize),
    /// The phase at this index failed (or the run was cancelled before it).
    Failed(usize),
    Succeeded,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    kind: PipelineKind,
    phases: Vec<String>,
}

impl Pipeline {
    pub fn new(kind: PipelineKind) -> Self {
        let phases = match kind {
            PipelineKind::Standard => STANDARD_PHASES,
            PipelineKind::Release => RELEASE_PHASES,
        };
        Self {
            kind,
            phases: phases.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn standard() -> Self {
        Self::new(PipelineKind::Standard)
    }

    pub fn release() -> Self {
        Self::new(PipelineKind::Release)
    }

    pub fn kind(&self) -> PipelineKind {
        self.kind
    }

    pub fn phases(&self) -> &[String] {
        &self.phases
    }

    /// Run every phase in order against all targets.
    ///
    /// A failed phase halts the pipeline. Dispatch errors (a phase command
    /// no target defines, a bad graph) are returned as-is and end the run.
    pub async fn run<E: Executor>(
        &self,
        dispatcher: &Dispatcher<'_, E>,
        type_filter: Option<TargetType>,
    ) -> Result<PipelineResult> {
        let started = Instant::now();
        let mut state = PipelineState::NotStarted;
        let mut phases = Vec::with_capacity(self.phases.len());
        let mut cancelled = false;

        for (i, phase) in self.phases.iter().enumerate() {
            if dispatcher.is_cancelled() {
                warn!(phase = %phase, "cancelled; not starting remaining phases");
                cancelled = true;
                state = transition(state, PipelineState::Failed(i), phase);
                break;
            }

            state = transition(state, PipelineState::Running(i), phase);
            let phase_started_at = Utc::now();
            let phase_started = Instant::now();

            let request = DispatchRequest::all(phase.as_str()).with_type(type_filter);
            let outcome = dispatcher.dispatch(&request).await.inspect_err(|e| {
                warn!(phase = %phase, error = %e, "phase could not be dispatched");
            })?;
            let success = outcome.success();
            cancelled |= outcome.cancelled;

            phases.push(PipelinePhaseResult {
                phase: phase.clone(),
                started_at: phase_started_at,
                finished_at: Utc::now(),
                duration: phase_started.elapsed(),
                success,
                outcome,
            });

            if !success {
                state = transition(state, PipelineState::Failed(i), phase);
                break;
            }
        }

        if matches!(state, PipelineState::Running(_)) {
            state = transition(state, PipelineState::Succeeded, "");
        }

        Ok(PipelineResult {
            kind: self.kind,
            phases,
            success: state == PipelineState::Succeeded,
            cancelled,
            duration: started.elapsed(),
        })
    }
}

fn transition(from: PipelineState, to: PipelineState, phase: &str) -> PipelineState {
    match to {
        PipelineState::Failed(_) => warn!(?from, ?to, phase, "pipeline phase failed"),
        _ => info!(?from, ?to, phase, "pipeline state change"),
    }
    to
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_differs_only_in_build_phase() {
        let standard = Pipeline::standard();
        let release = Pipeline::release();
        let diff: Vec<_> = standard
            .phases()
            .iter()
            .zip(release.phases())
            .filter(|(a, b)| a != b)
            .collect();
        assert_eq!(diff.len(), 1);
        assert_eq!(diff[0].1, "build:release");
        assert_eq!(release.kind(), PipelineKind::Release);
    }
}
