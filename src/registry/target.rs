// src/registry/target.rs

//! The `Target` capability set and its config-backed implementation.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::Path;

use crate::config::model::{CommandDefinition, TargetConfig};
use crate::types::TargetType;

/// Whether a target can run a given command name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// Defined as a literal or an alias.
    Runnable,
    /// Present in config but switched off.
    Disabled,
    /// Not mentioned at all.
    Undefined,
}

impl CommandStatus {
    /// "Defined" in the dispatch sense: mentioned in config, runnable or not.
    pub fn is_defined(self) -> bool {
        !matches!(self, CommandStatus::Undefined)
    }
}

/// One orchestrated component.
///
/// The registry and dispatcher only read targets through this trait; how a
/// command actually runs is up to the [`Executor`](crate::exec::Executor).
pub trait Target: Send + Sync + Debug {
    /// Unique, directory-safe key.
    fn name(&self) -> &str;

    fn title(&self) -> &str;

    fn target_type(&self) -> TargetType;

    fn directory(&self) -> &Path;

    /// Names of targets that must run first, in declaration order.
    fn depends_on(&self) -> &[String];

    fn command(&self, name: &str) -> Option<&CommandDefinition>;

    fn command_names(&self) -> Vec<&str>;

    /// Container image for docker execution, if any.
    fn image(&self) -> Option<&str>;

    fn env(&self) -> &BTreeMap<String, String>;

    fn vars(&self) -> &BTreeMap<String, String>;

    fn command_status(&self, name: &str) -> CommandStatus {
        match self.command(name) {
            Some(CommandDefinition::Disabled) => CommandStatus::Disabled,
            Some(_) => CommandStatus::Runnable,
            None => CommandStatus::Undefined,
        }
    }
}

/// A target read from the configuration file.
#[derive(Debug, Clone)]
pub struct ConfiguredTarget {
    config: TargetConfig,
}

impl ConfiguredTarget {
    pub fn new(config: TargetConfig) -> Self {
        Self { config }
    }
}

impl From<TargetConfig> for ConfiguredTarget {
    fn from(config: TargetConfig) -> Self {
        Self::new(config)
    }
}

impl Target for ConfiguredTarget {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn title(&self) -> &str {
        &self.config.title
    }

    fn target_type(&self) -> TargetType {
        self.config.target_type
    }

    fn directory(&self) -> &Path {
        &self.config.directory
    }

    fn depends_on(&self) -> &[String] {
        &self.config.depends_on
    }

    fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.config.commands.get(name)
    }

    fn command_names(&self) -> Vec<&str> {
        self.config.commands.keys().map(|s| s.as_str()).collect()
    }

    fn image(&self) -> Option<&str> {
        self.config.image.as_deref()
    }

    fn env(&self) -> &BTreeMap<String, String> {
        &self.config.env
    }

    fn vars(&self) -> &BTreeMap<String, String> {
        &self.config.vars
    }
}
