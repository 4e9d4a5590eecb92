// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::types::{TargetType, Verbosity};

/// Top-level configuration as read from disk, before validation.
///
/// ```toml
/// [config]
/// continue_on_error = false
///
/// [[target]]
/// name = "py"
/// directory = "py"
/// [target.commands]
/// build = "python -m build"
/// check = ["lint", "typecheck"]
/// publish = false
///
/// [[target]]
/// name = "rs"
/// depends_on = ["py"]
/// [target.commands]
/// build = "cargo build"
/// ```
///
/// Targets are an array rather than a table so that declaration order
/// survives deserialization; that order is the tie-break for execution.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default, alias = "targets")]
    pub target: Vec<RawTargetConfig>,
}

/// `[config]` section: invocation defaults that CLI flags may override.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigSection {
    /// Keep dispatching remaining targets after one fails.
    #[serde(default, alias = "continueOnError")]
    pub continue_on_error: bool,

    /// Run target commands inside each target's container image.
    #[serde(default)]
    pub docker: bool,

    #[serde(default)]
    pub verbosity: Verbosity,
}

/// One `[[target]]` entry as written by the user.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTargetConfig {
    pub name: String,

    /// Display name; falls back to `name`.
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default, rename = "type")]
    pub target_type: TargetType,

    /// Source directory relative to the project root; falls back to `name`.
    #[serde(default)]
    pub directory: Option<String>,

    #[serde(default, alias = "dependsOn")]
    pub depends_on: Vec<String>,

    /// Container image used when running with docker.
    #[serde(default)]
    pub image: Option<String>,

    /// Command name -> definition. `None` is a JSON `null`.
    #[serde(default)]
    pub commands: BTreeMap<String, Option<RawCommand>>,

    #[serde(default)]
    pub env: BTreeMap<String, String>,

    #[serde(default)]
    pub vars: BTreeMap<String, String>,
}

/// Command definition exactly as it appears in the file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawCommand {
    Literal(String),
    Alias(Vec<String>),
    /// Only `false` is meaningful (disabled); `true` is rejected by validation.
    Flag(bool),
}

/// Parsed command definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandDefinition {
    /// A single shell command line.
    Literal(String),
    /// Ordered list of other command names of the same target.
    Alias(Vec<String>),
    /// Declared but intentionally not runnable.
    Disabled,
}

/// Validated configuration.
///
/// Only constructed through `TryFrom<RawConfigFile>` (see `validate.rs`).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    /// Targets in declaration order.
    pub targets: Vec<TargetConfig>,
}

/// Validated target: defaults applied, commands parsed.
#[derive(Debug, Clone)]
pub struct TargetConfig {
    pub name: String,
    pub title: String,
    pub target_type: TargetType,
    pub directory: PathBuf,
    pub depends_on: Vec<String>,
    pub image: Option<String>,
    pub commands: BTreeMap<String, CommandDefinition>,
    pub env: BTreeMap<String, String>,
    pub vars: BTreeMap<String, String>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(config: ConfigSection, targets: Vec<TargetConfig>) -> Self {
        Self { config, targets }
    }

    /// Make every target directory relative to `root`.
    ///
    /// Absolute directories are left untouched.
    pub fn resolve_directories(&mut self, root: &std::path::Path) {
        for target in self.targets.iter_mut() {
            if target.directory.is_relative() {
                target.directory = root.join(&target.directory);
            }
        }
    }
}
