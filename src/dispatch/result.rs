// src/dispatch/result.rs

//! Values produced by a dispatch, for reporting.

use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::errors::ExitClass;
use crate::types::TargetType;

/// Outcome of running the command on one attempted target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchResult {
    pub name: String,
    pub success: bool,
    /// `None` on success.
    pub error: Option<String>,
    #[serde(serialize_with = "serialize_secs")]
    pub duration: Duration,
}

/// Why a dispatch ran nothing and still succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DispatchNotice {
    /// No target of this type exists.
    EmptyTypeFilter { target_type: TargetType },
    /// Every target that mentions the command has it disabled.
    AllDisabled { command: String },
}

impl fmt::Display for DispatchNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchNotice::EmptyTypeFilter { target_type } => {
                write!(f, "no {target_type} targets configured; nothing to do")
            }
            DispatchNotice::AllDisabled { command } => {
                write!(f, "'{command}' is disabled on every target that declares it; nothing to do")
            }
        }
    }
}

/// Aggregate of one dispatch invocation.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchOutcome {
    pub command: String,
    /// Attempted targets, in execution order.
    pub results: Vec<DispatchResult>,
    /// Selected targets that were never started (fail-fast or cancellation).
    pub not_attempted: Vec<String>,
    /// Targets skipped because the command is disabled for them.
    pub disabled: Vec<String>,
    pub notice: Option<DispatchNotice>,
    pub cancelled: bool,
    #[serde(serialize_with = "serialize_secs")]
    pub duration: Duration,
}

impl DispatchOutcome {
    /// True when no attempted target failed and the run was not cancelled.
    pub fn success(&self) -> bool {
        !self.cancelled && self.results.iter().all(|r| r.success)
    }

    pub fn failed(&self) -> impl Iterator<Item = &DispatchResult> {
        self.results.iter().filter(|r| !r.success)
    }

    pub fn attempted(&self) -> usize {
        self.results.len()
    }

    pub fn result_for(&self, name: &str) -> Option<&DispatchResult> {
        self.results.iter().find(|r| r.name == name)
    }

    /// Summary for multi-target runs.
    ///
    /// Returns `None` when at most one target was attempted; a single
    /// failure is already reported by its own error message.
    pub fn summary(&self) -> Option<DispatchSummary> {
        if self.attempted() <= 1 {
            return None;
        }
        let failed_targets: Vec<String> = self.failed().map(|r| r.name.clone()).collect();
        Some(DispatchSummary {
            command: self.command.clone(),
            passed: self.attempted() - failed_targets.len(),
            failed: failed_targets.len(),
            not_attempted: self.not_attempted.len(),
            duration: self.duration,
            failed_targets,
        })
    }

    pub fn exit_class(&self) -> ExitClass {
        if self.success() {
            ExitClass::Success
        } else {
            ExitClass::Runtime
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchSummary {
    pub command: String,
    pub passed: usize,
    pub failed: usize,
    pub not_attempted: usize,
    #[serde(serialize_with = "serialize_secs")]
    pub duration: Duration,
    pub failed_targets: Vec<String>,
}

/// Durations are reported as fractional seconds.
pub(crate) fn serialize_secs<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, success: bool) -> DispatchResult {
        DispatchResult {
            name: name.into(),
            success,
            error: (!success).then(|| "boom".to_string()),
            duration: Duration::from_millis(10),
        }
    }

    fn outcome(results: Vec<DispatchResult>) -> DispatchOutcome {
        DispatchOutcome {
            command: "build".into(),
            results,
            not_attempted: vec![],
            disabled: vec![],
            notice: None,
            cancelled: false,
            duration: Duration::from_millis(30),
        }
    }

    #[test]
    fn no_summary_for_single_target() {
        let o = outcome(vec![result("py", false)]);
        assert!(o.summary().is_none());
        assert!(!o.success());
        assert_eq!(o.exit_class(), ExitClass::Runtime);
    }

    #[test]
    fn summary_counts_failures() {
        let o = outcome(vec![result("py", true), result("rs", false), result("go", true)]);
        let s = o.summary().unwrap();
        assert_eq!(s.passed, 2);
        assert_eq!(s.failed, 1);
        assert_eq!(s.failed_targets, vec!["rs"]);
    }

    #[test]
    fn empty_outcome_is_success() {
        let o = outcome(vec![]);
        assert!(o.success());
        assert_eq!(o.exit_class(), ExitClass::Success);
    }

    #[test]
    fn cancelled_outcome_is_failure() {
        let mut o = outcome(vec![result("py", true)]);
        o.cancelled = true;
        assert!(!o.success());
    }

    #[test]
    fn serializes_durations_as_seconds() {
        let json = serde_json::to_value(result("py", true)).unwrap();
        assert_eq!(json["duration"], serde_json::json!(0.01));
        assert_eq!(json["error"], serde_json::Value::Null);
    }
}
