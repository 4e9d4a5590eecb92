use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use monorun::dispatch::CancelHandle;
use monorun::errors::{MonorunError, Result};
use monorun::exec::{ExecOptions, Executor};
use monorun::registry::{CommandStatus, Target};
use tracing::debug;

/// A fake executor that:
/// - records every `(target, command)` it is asked to run, in order
/// - fails the targets it was told to fail, succeeds otherwise
/// - rejects disabled commands with `CommandDisabled`, like `ShellExecutor`
/// - can raise a cancel handle right after a given target runs
#[derive(Debug, Clone, Default)]
pub struct RecordingExecutor {
    executed: Arc<Mutex<Vec<(String, String)>>>,
    failing: HashSet<(String, Option<String>)>,
    cancel_after: Option<(String, CancelHandle)>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every command run on `target`.
    pub fn failing(mut self, target: &str) -> Self {
        self.failing.insert((target.to_string(), None));
        self
    }

    /// Fail only `command` on `target`.
    pub fn failing_command(mut self, target: &str, command: &str) -> Self {
        self.failing
            .insert((target.to_string(), Some(command.to_string())));
        self
    }

    /// Raise `handle` once `target` has run.
    pub fn cancel_after(mut self, target: &str, handle: CancelHandle) -> Self {
        self.cancel_after = Some((target.to_string(), handle));
        self
    }

    /// Shared log of executed `(target, command)` pairs.
    pub fn log(&self) -> Arc<Mutex<Vec<(String, String)>>> {
        Arc::clone(&self.executed)
    }

    /// Target names in execution order.
    pub fn executed_targets(&self) -> Vec<String> {
        self.executed
            .lock()
            .unwrap()
            .iter()
            .map(|(t, _)| t.clone())
            .collect()
    }

    /// Executed `(target, command)` pairs in order.
    pub fn executed(&self) -> Vec<(String, String)> {
        self.executed.lock().unwrap().clone()
    }

    fn should_fail(&self, target: &str, command: &str) -> bool {
        self.failing.contains(&(target.to_string(), None))
            || self
                .failing
                .contains(&(target.to_string(), Some(command.to_string())))
    }
}

impl Executor for RecordingExecutor {
    fn execute<'a>(
        &'a self,
        target: &'a dyn Target,
        command: &'a str,
        _options: &'a ExecOptions,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            {
                let mut guard = self.executed.lock().unwrap();
                guard.push((target.name().to_string(), command.to_string()));
            }
            debug!(name = target.name(), command, "recorded fake execution");

            if let Some((after, handle)) = &self.cancel_after {
                if after == target.name() {
                    handle.cancel();
                }
            }

            if target.command_status(command) == CommandStatus::Disabled {
                return Err(MonorunError::CommandDisabled {
                    target: target.name().to_string(),
                    command: command.to_string(),
                });
            }

            if self.should_fail(target.name(), command) {
                return Err(MonorunError::CommandFailed {
                    target: target.name().to_string(),
                    command: command.to_string(),
                    code: 1,
                });
            }
            Ok(())
        })
    }
}
