// src/dispatch/mod.rs

//! Command dispatch.
//!
//! A [`DispatchRequest`] names a command and, optionally, one target.
//!
//! - Single-target mode runs the command on that target once, or fails
//!   straight away if the target does not define it.
//! - All-targets mode takes the registry's topological order, applies the
//!   type filter (`test` defaults to language targets), keeps the targets
//!   that define the command and runs them one by one.
//!
//! [`plan`] does the resolution, [`dispatcher`] the execution and failure
//! policy, [`result`] holds what gets reported, and [`cancel`] the
//! invocation-wide stop signal.

pub mod cancel;
pub mod dispatcher;
pub mod plan;
pub mod result;

pub use cancel::{cancel_pair, CancelHandle, CancelSignal};
pub use dispatcher::{DispatchSettings, Dispatcher};
pub use plan::{DispatchMode, DispatchPlan, DispatchRequest};
pub use result::{DispatchNotice, DispatchOutcome, DispatchResult, DispatchSummary};
