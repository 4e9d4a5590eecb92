// src/exec/backend.rs

//! Pluggable executor abstraction.
//!
//! The dispatcher talks to an `Executor` instead of spawning processes
//! itself. Production uses [`ShellExecutor`](super::ShellExecutor); tests
//! provide a fake that records calls and fails on demand.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::registry::Target;
use crate::types::Verbosity;

/// Per-invocation execution options, passed unchanged to every call.
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    /// Run inside the target's container image instead of natively.
    pub docker: bool,
    /// Extra arguments appended to each resolved command line.
    pub args: Vec<String>,
    pub verbosity: Verbosity,
}

/// Runs one command on one target.
///
/// Implementations resolve aliases, interpolate variables and spawn
/// processes; the caller only looks at `Ok` versus `Err`. The returned
/// future must complete only once the work has finished: targets are run
/// strictly one after another.
pub trait Executor: Send + Sync {
    fn execute<'a>(
        &'a self,
        target: &'a dyn Target,
        command: &'a str,
        options: &'a ExecOptions,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

impl<E: Executor + ?Sized> Executor for &E {
    fn execute<'a>(
        &'a self,
        target: &'a dyn Target,
        command: &'a str,
        options: &'a ExecOptions,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        (**self).execute(target, command, options)
    }
}
