// src/report.rs

//! Plain-text and JSON rendering of plans and results.
//!
//! Everything here returns a `String`; the caller decides where it goes.

use std::fmt::Write as _;
use std::time::Duration;

use serde::Serialize;

use crate::dispatch::{DispatchOutcome, DispatchPlan};
use crate::errors::Result;
use crate::pipeline::PipelineResult;
use crate::registry::{Registry, Target};

fn secs(d: Duration) -> String {
    format!("{:.2}s", d.as_secs_f64())
}

/// Targets in execution order, with type, dependencies and commands.
pub fn render_registry(registry: &Registry) -> Result<String> {
    let mut out = String::new();
    let order = registry.topological_order()?;
    let _ = writeln!(out, "targets ({}), in execution order:", order.len());
    for target in order {
        let _ = writeln!(out, "  - {} ({}, {})", target.name(), target.title(), target.target_type());
        let _ = writeln!(out, "      directory: {}", target.directory().display());
        if !target.depends_on().is_empty() {
            let _ = writeln!(out, "      depends_on: {}", target.depends_on().join(", "));
        }
        let _ = writeln!(out, "      commands: {}", target.command_names().join(", "));
    }
    Ok(out)
}

#[derive(Serialize)]
struct TargetView<'a> {
    name: &'a str,
    title: &'a str,
    #[serde(rename = "type")]
    target_type: crate::types::TargetType,
    directory: String,
    depends_on: &'a [String],
    commands: Vec<&'a str>,
}

fn target_view(target: &dyn Target) -> TargetView<'_> {
    TargetView {
        name: target.name(),
        title: target.title(),
        target_type: target.target_type(),
        directory: target.directory().display().to_string(),
        depends_on: target.depends_on(),
        commands: target.command_names(),
    }
}

pub fn registry_json(registry: &Registry) -> Result<String> {
    let views: Vec<TargetView<'_>> = registry
        .topological_order()?
        .into_iter()
        .map(target_view)
        .collect();
    Ok(serde_json::to_string_pretty(&views)?)
}

/// What a dispatch would do, for `--dry-run`.
pub fn render_plan(plan: &DispatchPlan<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "plan for '{}':", plan.command);
    if let Some(ty) = plan.type_filter {
        let _ = writeln!(out, "  type filter: {ty}");
    }
    for (i, target) in plan.targets.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, target.name());
    }
    for target in plan.disabled.iter() {
        let _ = writeln!(out, "  - {} (disabled)", target.name());
    }
    if let Some(notice) = &plan.notice {
        let _ = writeln!(out, "  note: {notice}");
    }
    out
}

/// Summary block for a dispatch, or `None` when there is nothing to summarise.
pub fn render_dispatch(outcome: &DispatchOutcome) -> Option<String> {
    let mut out = String::new();

    if let Some(notice) = &outcome.notice {
        let _ = writeln!(out, "note: {notice}");
    }

    if let Some(summary) = outcome.summary() {
        let _ = writeln!(
            out,
            "{}: {} passed, {} failed, {} not run ({})",
            summary.command,
            summary.passed,
            summary.failed,
            summary.not_attempted,
            secs(summary.duration)
        );
        for result in outcome.results.iter() {
            let status = if result.success { "ok  " } else { "FAIL" };
            let _ = writeln!(out, "  {status} {} ({})", result.name, secs(result.duration));
        }
        for name in outcome.not_attempted.iter() {
            let _ = writeln!(out, "  skip {name}");
        }
        if !summary.failed_targets.is_empty() {
            let _ = writeln!(out, "failed: {}", summary.failed_targets.join(", "));
        }
    }

    if outcome.cancelled {
        let _ = writeln!(out, "cancelled");
    }

    (!out.is_empty()).then_some(out)
}

pub fn render_pipeline(result: &PipelineResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ci ({:?}):", result.kind);
    for phase in result.phases.iter() {
        let status = if phase.success { "ok  " } else { "FAIL" };
        let _ = writeln!(out, "  {status} {} ({})", phase.phase, secs(phase.duration));
        for failed in phase.outcome.failed() {
            let _ = writeln!(out, "         {} failed", failed.name);
        }
    }
    let verdict = if result.success { "passed" } else { "failed" };
    let _ = writeln!(out, "ci {verdict} in {}", secs(result.duration));
    out
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DispatchResult;

    fn outcome(results: Vec<(&str, bool)>, not_attempted: Vec<&str>) -> DispatchOutcome {
        DispatchOutcome {
            command: "build".into(),
            results: results
                .into_iter()
                .map(|(name, success)| DispatchResult {
                    name: name.into(),
                    success,
                    error: None,
                    duration: Duration::from_millis(5),
                })
                .collect(),
            not_attempted: not_attempted.into_iter().map(String::from).collect(),
            disabled: vec![],
            notice: None,
            cancelled: false,
            duration: Duration::from_millis(10),
        }
    }

    #[test]
    fn single_target_dispatch_renders_nothing() {
        assert!(render_dispatch(&outcome(vec![("py", false)], vec![])).is_none());
    }

    #[test]
    fn multi_target_summary_lists_failures_and_skips() {
        let text = render_dispatch(&outcome(vec![("py", true), ("rs", false)], vec!["go"])).unwrap();
        assert!(text.contains("1 passed, 1 failed, 1 not run"));
        assert!(text.contains("skip go"));
        assert!(text.contains("failed: rs"));
    }
}
