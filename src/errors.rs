// src/errors.rs

//! Crate-wide error type and exit-code classification.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonorunError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Target not found: {0}")]
    TargetNotFound(String),

    #[error("target not found: '{target}' depends on '{missing}', which is not declared")]
    DanglingDependency { target: String, missing: String },

    #[error("Cycle detected in target dependencies involving '{target}' (members: {})", .members.join(", "))]
    DependencyCycle { target: String, members: Vec<String> },

    #[error("{}", unknown_command_message(.command, .target.as_deref()))]
    UnknownCommand {
        command: String,
        target: Option<String>,
    },

    #[error("command '{command}' is disabled for target '{target}'")]
    CommandDisabled { target: String, command: String },

    #[error("command '{command}' failed for target '{target}' (exit code {code})")]
    CommandFailed {
        target: String,
        command: String,
        code: i32,
    },

    #[error("undefined variable '{variable}' in command for target '{target}'")]
    Interpolation { target: String, variable: String },

    #[error("target '{0}' has no `image` configured; it cannot run in docker")]
    MissingImage(String),

    #[error("run cancelled")]
    Cancelled,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn unknown_command_message(command: &str, target: Option<&str>) -> String {
    match target {
        Some(t) => format!("undefined command '{command}' for target '{t}'"),
        None => format!("unknown command: no target defines '{command}'"),
    }
}

impl MonorunError {
    /// Which of the three caller-visible outcome classes this error maps to.
    pub fn exit_class(&self) -> ExitClass {
        match self {
            MonorunError::ConfigError(_)
            | MonorunError::IoError(_)
            | MonorunError::TomlError(_)
            | MonorunError::JsonError(_)
            | MonorunError::TargetNotFound(_)
            | MonorunError::DanglingDependency { .. }
            | MonorunError::DependencyCycle { .. }
            | MonorunError::UnknownCommand { .. } => ExitClass::Configuration,
            MonorunError::CommandDisabled { .. }
            | MonorunError::CommandFailed { .. }
            | MonorunError::Interpolation { .. }
            | MonorunError::MissingImage(_)
            | MonorunError::Cancelled
            | MonorunError::Other(_) => ExitClass::Runtime,
        }
    }
}

/// Process exit classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitClass {
    Success,
    /// A target, command or phase failed while running.
    Runtime,
    /// Structural problem: unknown command, unknown target, bad dependency graph.
    Configuration,
}

impl ExitClass {
    pub fn code(self) -> i32 {
        match self {
            ExitClass::Success => 0,
            ExitClass::Runtime => 1,
            ExitClass::Configuration => 2,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, MonorunError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_errors_map_to_configuration_class() {
        let err = MonorunError::DependencyCycle {
            target: "a".into(),
            members: vec!["a".into(), "b".into()],
        };
        assert_eq!(err.exit_class(), ExitClass::Configuration);
        assert_eq!(err.exit_class().code(), 2);

        let err = MonorunError::UnknownCommand {
            command: "lint".into(),
            target: None,
        };
        assert_eq!(err.exit_class(), ExitClass::Configuration);
        assert!(err.to_string().contains("unknown command"));
    }

    #[test]
    fn execution_errors_map_to_runtime_class() {
        let err = MonorunError::CommandFailed {
            target: "py".into(),
            command: "build".into(),
            code: 3,
        };
        assert_eq!(err.exit_class().code(), 1);
    }

    #[test]
    fn dangling_dependency_message_says_target_not_found() {
        let err = MonorunError::DanglingDependency {
            target: "rs".into(),
            missing: "go".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("target not found"));
        assert!(msg.contains("go"));
    }
}
