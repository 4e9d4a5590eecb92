// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::types::{TargetType, Verbosity};

/// Command-line arguments for `monorun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "monorun",
    version,
    about = "Run build, test and other commands across the targets of a multi-language monorepo.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML or JSON).
    ///
    /// Default: `Monorun.toml`, then `monorun.json`, in the current directory.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `MONORUN_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Echo each command line before running it.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Discard command stdout.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Run a command on one target, or on every target that defines it.
    Run(RunArgs),

    /// Run the CI pipeline: clean, restore, check, build, test.
    Ci(CiArgs),

    /// List targets in execution order.
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Flags shared by `run` and `ci`.
#[derive(Debug, Clone, Args)]
pub struct DispatchFlags {
    /// Only run targets of this type (language or auxiliary).
    #[arg(long = "type", value_name = "TYPE")]
    pub target_type: Option<TargetType>,

    /// Keep going after a target fails.
    #[arg(long)]
    pub continue_on_error: bool,

    /// Run commands inside each target's container image.
    #[arg(long)]
    pub docker: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Command name, e.g. `build`, `test`, `build:release`.
    pub command: String,

    /// Target to run on; all targets when omitted.
    pub target: Option<String>,

    #[command(flatten)]
    pub flags: DispatchFlags,

    /// Print what would run, without running it.
    #[arg(long)]
    pub dry_run: bool,

    /// Extra arguments appended to the command (after `--`).
    #[arg(last = true)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct CiArgs {
    /// Build with `build:release` instead of `build`.
    #[arg(long)]
    pub release: bool,

    #[command(flatten)]
    pub flags: DispatchFlags,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl CliArgs {
    /// `None` when neither `-v` nor `-q` was given, so config can decide.
    pub fn verbosity(&self) -> Option<Verbosity> {
        match (self.verbose, self.quiet) {
            (true, _) => Some(Verbosity::Verbose),
            (_, true) => Some(Verbosity::Quiet),
            _ => None,
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
