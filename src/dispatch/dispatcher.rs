// src/dispatch/dispatcher.rs

use std::time::Instant;

use tracing::{error, info, warn};

use crate::dispatch::cancel::CancelSignal;
use crate::dispatch::plan::{resolve, DispatchPlan, DispatchRequest};
use crate::dispatch::result::{DispatchOutcome, DispatchResult};
use crate::errors::Result;
use crate::exec::{ExecOptions, Executor};
use crate::registry::Registry;

/// Per-invocation dispatch settings.
///
/// Passed in explicitly; nothing here is global.
#[derive(Debug, Clone, Default)]
pub struct DispatchSettings {
    /// Keep going after a target fails; the dispatch still reports failure.
    pub continue_on_error: bool,
    pub exec: ExecOptions,
}

/// Runs commands against the targets of one [`Registry`].
///
/// Targets run strictly one at a time, in topological order, each awaited to
/// completion before the next one starts.
#[derive(Debug)]
pub struct Dispatcher<'r, E> {
    registry: &'r Registry,
    executor: E,
    settings: DispatchSettings,
    cancel: CancelSignal,
}

impl<'r, E: Executor> Dispatcher<'r, E> {
    pub fn new(registry: &'r Registry, executor: E, settings: DispatchSettings) -> Self {
        Self {
            registry,
            executor,
            settings,
            cancel: CancelSignal::never(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolve `request` without executing anything.
    pub fn plan(&self, request: &DispatchRequest) -> Result<DispatchPlan<'r>> {
        resolve(self.registry, request)
    }

    /// Resolve and run `request`.
    ///
    /// `Err` means nothing ran (unknown target/command, bad graph). Target
    /// failures are reported inside the `Ok` outcome.
    pub async fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchOutcome> {
        let plan = self.plan(request)?;
        Ok(self.execute_plan(&plan).await)
    }

    /// Run an already resolved plan.
    pub async fn execute_plan(&self, plan: &DispatchPlan<'r>) -> DispatchOutcome {
        let started = Instant::now();
        let command = plan.command.as_str();

        if let Some(notice) = &plan.notice {
            warn!(command, "{notice}");
        }
        for target in plan.disabled.iter() {
            info!(name = target.name(), command, "command disabled for target; skipping");
        }

        let mut results = Vec::with_capacity(plan.targets.len());
        let mut not_attempted = Vec::new();
        let mut cancelled = false;

        for (i, target) in plan.targets.iter().enumerate() {
            if self.cancel.is_cancelled() {
                warn!(command, "cancelled; not starting remaining targets");
                cancelled = true;
                not_attempted.extend(plan.targets[i..].iter().map(|t| t.name().to_string()));
                break;
            }

            info!(name = target.name(), command, "running target");
            let target_started = Instant::now();
            let res = self
                .executor
                .execute(*target, command, &self.settings.exec)
                .await;
            let duration = target_started.elapsed();

            let failed = res.is_err();
            match &res {
                Ok(()) => info!(name = target.name(), command, ?duration, "target succeeded"),
                Err(e) => error!(name = target.name(), command, ?duration, error = %e, "target failed"),
            }
            results.push(DispatchResult {
                name: target.name().to_string(),
                success: !failed,
                error: res.err().map(|e| e.to_string()),
                duration,
            });

            if failed && !self.settings.continue_on_error {
                not_attempted.extend(plan.targets[i + 1..].iter().map(|t| t.name().to_string()));
                if !not_attempted.is_empty() {
                    info!(command, skipped = ?not_attempted, "stopping after first failure");
                }
                break;
            }
        }

        DispatchOutcome {
            command: command.to_string(),
            results,
            not_attempted,
            disabled: plan.disabled.iter().map(|t| t.name().to_string()).collect(),
            notice: plan.notice.clone(),
            cancelled,
            duration: started.elapsed(),
        }
    }
}
