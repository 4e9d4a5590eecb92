// src/dispatch/plan.rs

//! Resolving a dispatch request into an ordered target list, without running
//! anything.

use tracing::debug;

use crate::dispatch::result::DispatchNotice;
use crate::errors::{MonorunError, Result};
use crate::registry::{CommandStatus, Registry, Target};
use crate::types::TargetType;

/// Command that is restricted to language targets unless `--type` says otherwise.
pub const LANGUAGE_ONLY_COMMAND: &str = "test";

/// "Run `command` [on `target`]".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    pub command: String,
    /// Explicit target; `None` means all targets.
    pub target: Option<String>,
    /// `--type`; ignored when a target is named.
    pub type_filter: Option<TargetType>,
}

impl DispatchRequest {
    /// Run `command` on every eligible target.
    pub fn all(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            target: None,
            type_filter: None,
        }
    }

    /// Run `command` on the single named target.
    pub fn single(command: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            target: Some(target.into()),
            type_filter: None,
        }
    }

    pub fn with_type(mut self, type_filter: Option<TargetType>) -> Self {
        self.type_filter = type_filter;
        self
    }

    /// The type filter actually applied in all-targets mode.
    pub fn effective_type_filter(&self) -> Option<TargetType> {
        self.type_filter.or_else(|| {
            (self.command == LANGUAGE_ONLY_COMMAND).then_some(TargetType::Language)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    Single,
    All,
}

/// Concrete, ordered list of targets a request resolves to.
#[derive(Debug, Clone)]
pub struct DispatchPlan<'r> {
    pub command: String,
    pub mode: DispatchMode,
    /// Targets to execute, in execution order.
    pub targets: Vec<&'r dyn Target>,
    /// All-targets mode only: targets that declare the command as disabled.
    /// They are skipped, never executed.
    pub disabled: Vec<&'r dyn Target>,
    pub type_filter: Option<TargetType>,
    pub notice: Option<DispatchNotice>,
}

impl DispatchPlan<'_> {
    pub fn target_names(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Resolve `request` against `registry`.
///
/// Errors here are structural (unknown target, cycle) or unknown-command;
/// nothing has run when they are returned.
pub fn resolve<'r>(registry: &'r Registry, request: &DispatchRequest) -> Result<DispatchPlan<'r>> {
    match request.target.as_deref() {
        Some(name) => resolve_single(registry, &request.command, name),
        None => resolve_all(registry, request),
    }
}

fn resolve_single<'r>(registry: &'r Registry, command: &str, name: &str) -> Result<DispatchPlan<'r>> {
    let target = registry
        .get(name)
        .ok_or_else(|| MonorunError::TargetNotFound(name.to_string()))?;

    let mut plan = DispatchPlan {
        command: command.to_string(),
        mode: DispatchMode::Single,
        targets: Vec::new(),
        disabled: Vec::new(),
        type_filter: None,
        notice: None,
    };

    // A disabled command still goes to the executor, which reports it.
    match target.command_status(command) {
        CommandStatus::Runnable | CommandStatus::Disabled => plan.targets.push(target),
        CommandStatus::Undefined => {
            return Err(MonorunError::UnknownCommand {
                command: command.to_string(),
                target: Some(name.to_string()),
            });
        }
    }

    Ok(plan)
}

fn resolve_all<'r>(registry: &'r Registry, request: &DispatchRequest) -> Result<DispatchPlan<'r>> {
    let command = request.command.as_str();
    let type_filter = request.effective_type_filter();

    // 1. Dependencies first.
    let order = registry.topological_order()?;

    // 2. Type filter.
    let typed: Vec<&dyn Target> = order
        .into_iter()
        .filter(|t| type_filter.is_none_or(|ty| t.target_type() == ty))
        .collect();

    let mut plan = DispatchPlan {
        command: command.to_string(),
        mode: DispatchMode::All,
        targets: Vec::new(),
        disabled: Vec::new(),
        type_filter,
        notice: None,
    };

    if typed.is_empty() {
        if let Some(target_type) = type_filter {
            plan.notice = Some(DispatchNotice::EmptyTypeFilter { target_type });
            return Ok(plan);
        }
    }

    // 3. Command presence.
    for target in typed {
        match target.command_status(command) {
            CommandStatus::Runnable => plan.targets.push(target),
            CommandStatus::Disabled => plan.disabled.push(target),
            CommandStatus::Undefined => {
                debug!(name = target.name(), command, "target does not define command; skipping");
            }
        }
    }

    if plan.targets.is_empty() {
        if plan.disabled.is_empty() {
            return Err(MonorunError::UnknownCommand {
                command: command.to_string(),
                target: None,
            });
        }
        plan.notice = Some(DispatchNotice::AllDisabled {
            command: command.to_string(),
        });
    }

    Ok(plan)
}
