// src/exec/mod.rs

//! Command execution layer.
//!
//! - [`backend`] defines the [`Executor`] trait the dispatcher calls, and the
//!   per-invocation [`ExecOptions`].
//! - [`resolve`] expands aliases, fills `{{ var }}` placeholders and appends
//!   extra arguments.
//! - [`shell`] provides [`ShellExecutor`], which runs the resolved lines with
//!   `tokio::process::Command`, natively or via `docker run`.

pub mod backend;
pub mod resolve;
pub mod shell;

pub use backend::{ExecOptions, Executor};
pub use resolve::resolve_command_lines;
pub use shell::ShellExecutor;
