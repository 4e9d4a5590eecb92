// src/exec/shell.rs

//! Process-backed executor: `sh -c` natively, or `docker run` per target.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::Context;
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{MonorunError, Result};
use crate::exec::backend::{ExecOptions, Executor};
use crate::exec::resolve::resolve_command_lines;
use crate::registry::Target;
use crate::types::Verbosity;

/// Mount point of the target directory inside the container.
const CONTAINER_WORKDIR: &str = "/workspace";

#[derive(Debug, Clone, Default)]
pub struct ShellExecutor;

impl ShellExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Executor for ShellExecutor {
    fn execute<'a>(
        &'a self,
        target: &'a dyn Target,
        command: &'a str,
        options: &'a ExecOptions,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let lines = resolve_command_lines(target, command, &options.args)?;
            debug!(name = target.name(), command, lines = lines.len(), "resolved command");

            for line in lines {
                run_line(target, command, &line, options).await?;
            }
            Ok(())
        })
    }
}

async fn run_line(
    target: &dyn Target,
    command: &str,
    line: &str,
    options: &ExecOptions,
) -> Result<()> {
    if options.verbosity == Verbosity::Verbose {
        eprintln!("[{}] $ {}", target.name(), line);
    }
    info!(name = target.name(), command, cmd = %line, docker = options.docker, "starting process");

    let mut cmd = if options.docker {
        docker_command(target, line)?
    } else {
        native_command(target, line)
    };

    cmd.stdin(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);
    if options.verbosity == Verbosity::Quiet {
        cmd.stdout(Stdio::null());
    } else {
        cmd.stdout(Stdio::inherit());
    }

    let status = cmd
        .status()
        .await
        .with_context(|| format!("spawning process for target '{}'", target.name()))?;

    let code = status.code().unwrap_or(-1);
    info!(name = target.name(), command, exit_code = code, "process exited");

    if status.success() {
        Ok(())
    } else {
        Err(MonorunError::CommandFailed {
            target: target.name().to_string(),
            command: command.to_string(),
            code,
        })
    }
}

fn native_command(target: &dyn Target, line: &str) -> Command {
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(line);
        c
    };
    cmd.current_dir(target.directory()).envs(target.env());
    cmd
}

fn docker_command(target: &dyn Target, line: &str) -> Result<Command> {
    let image = target
        .image()
        .ok_or_else(|| MonorunError::MissingImage(target.name().to_string()))?;

    let mut cmd = Command::new("docker");
    cmd.args(docker_args(target.directory(), image, target, line)?);
    Ok(cmd)
}

fn docker_args(dir: &Path, image: &str, target: &dyn Target, line: &str) -> Result<Vec<String>> {
    let host_dir = std::path::absolute(dir)?;

    let mut args = vec![
        "run".to_string(),
        "--rm".to_string(),
        "-v".to_string(),
        format!("{}:{CONTAINER_WORKDIR}", host_dir.display()),
        "-w".to_string(),
        CONTAINER_WORKDIR.to_string(),
    ];
    for (key, value) in target.env() {
        args.push("-e".to_string());
        args.push(format!("{key}={value}"));
    }
    args.extend([image.to_string(), "sh".to_string(), "-c".to_string(), line.to_string()]);
    Ok(args)
}
