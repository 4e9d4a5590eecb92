// src/lib.rs

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod types;

use std::path::Path;

use tracing::{debug, warn};

use crate::cli::{CiArgs, CliArgs, CliCommand, DispatchFlags, OutputFormat, RunArgs};
use crate::config::loader::{default_config_path, load_and_validate};
use crate::config::model::ConfigFile;
use crate::dispatch::{
    cancel_pair, CancelHandle, DispatchMode, DispatchRequest, DispatchSettings, Dispatcher,
};
use crate::errors::{ExitClass, Result};
use crate::exec::{ExecOptions, ShellExecutor};
use crate::pipeline::Pipeline;
use crate::registry::Registry;
use crate::types::{PipelineKind, Verbosity};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and registry construction
/// - dispatcher / pipeline
/// - the process executor
/// - Ctrl-C handling
///
/// `Err` is a structural or unknown-command problem; target and phase
/// failures come back as `Ok(ExitClass::Runtime)` after their report has
/// been printed.
pub async fn run(args: CliArgs) -> Result<ExitClass> {
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| default_config_path(Path::new(".")));
    let cfg = load_and_validate(&config_path)?;
    let registry = Registry::from_config(&cfg)?;

    match &args.command {
        CliCommand::List { format } => {
            let text = match format {
                OutputFormat::Text => report::render_registry(&registry)?,
                OutputFormat::Json => report::registry_json(&registry)?,
            };
            print!("{text}");
            Ok(ExitClass::Success)
        }
        CliCommand::Run(run_args) => run_command(&cfg, &registry, args.verbosity(), run_args).await,
        CliCommand::Ci(ci_args) => run_ci(&cfg, &registry, args.verbosity(), ci_args).await,
    }
}

async fn run_command(
    cfg: &ConfigFile,
    registry: &Registry,
    verbosity: Option<Verbosity>,
    run_args: &RunArgs,
) -> Result<ExitClass> {
    let settings = dispatch_settings(cfg, verbosity, &run_args.flags, run_args.args.clone());
    let (handle, signal) = cancel_pair();
    let dispatcher = Dispatcher::new(registry, ShellExecutor::new(), settings).with_cancel(signal);

    let mut request = DispatchRequest::all(run_args.command.as_str()).with_type(run_args.flags.target_type);
    request.target = run_args.target.clone();

    let plan = dispatcher.plan(&request)?;
    debug!(targets = ?plan.target_names(), "dispatch plan resolved");

    if run_args.dry_run {
        print!("{}", report::render_plan(&plan));
        return Ok(ExitClass::Success);
    }

    spawn_ctrl_c(handle);
    let outcome = dispatcher.execute_plan(&plan).await;

    match run_args.flags.format {
        OutputFormat::Json => println!("{}", report::to_json(&outcome)?),
        OutputFormat::Text => {
            if plan.mode == DispatchMode::Single {
                for failed in outcome.failed() {
                    if let Some(err) = &failed.error {
                        eprintln!("monorun: {err}");
                    }
                }
            }
            if let Some(text) = report::render_dispatch(&outcome) {
                eprint!("{text}");
            }
        }
    }

    Ok(outcome.exit_class())
}

async fn run_ci(
    cfg: &ConfigFile,
    registry: &Registry,
    verbosity: Option<Verbosity>,
    ci_args: &CiArgs,
) -> Result<ExitClass> {
    let settings = dispatch_settings(cfg, verbosity, &ci_args.flags, Vec::new());
    let (handle, signal) = cancel_pair();
    let dispatcher = Dispatcher::new(registry, ShellExecutor::new(), settings).with_cancel(signal);

    let kind = if ci_args.release {
        PipelineKind::Release
    } else {
        PipelineKind::Standard
    };

    spawn_ctrl_c(handle);
    let result = Pipeline::new(kind).run(&dispatcher, ci_args.flags.target_type).await?;

    match ci_args.flags.format {
        OutputFormat::Json => println!("{}", report::to_json(&result)?),
        OutputFormat::Text => eprint!("{}", report::render_pipeline(&result)),
    }

    Ok(result.exit_class())
}

/// Merge `[config]` defaults with CLI flags; flags can only switch things on.
fn dispatch_settings(
    cfg: &ConfigFile,
    verbosity: Option<Verbosity>,
    flags: &DispatchFlags,
    args: Vec<String>,
) -> DispatchSettings {
    DispatchSettings {
        continue_on_error: flags.continue_on_error || cfg.config.continue_on_error,
        exec: ExecOptions {
            docker: flags.docker || cfg.config.docker,
            args,
            verbosity: verbosity.unwrap_or(cfg.config.verbosity),
        },
    }
}

/// Ctrl-C lets the running target finish, then stops.
fn spawn_ctrl_c(handle: CancelHandle) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        warn!("interrupt received; no further targets will be started");
        handle.cancel();
    });
}
