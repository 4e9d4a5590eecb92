#![allow(dead_code)]

use std::collections::BTreeMap;

use monorun::config::{ConfigFile, ConfigSection, RawCommand, RawConfigFile, RawTargetConfig};
use monorun::registry::Registry;
use monorun::types::TargetType;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                target: Vec::new(),
            },
        }
    }

    pub fn with_target(mut self, target: RawTargetConfig) -> Self {
        self.config.target.push(target);
        self
    }

    pub fn continue_on_error(mut self, val: bool) -> Self {
        self.config.config.continue_on_error = val;
        self
    }

    /// Raw, unvalidated form.
    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }

    /// Validated config turned into a registry; panics on structural errors.
    pub fn registry(self) -> Registry {
        Registry::from_config(&self.build()).expect("Failed to build registry from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `RawTargetConfig`.
pub struct TargetConfigBuilder {
    target: RawTargetConfig,
}

impl TargetConfigBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            target: RawTargetConfig {
                name: name.to_string(),
                title: None,
                target_type: TargetType::Language,
                directory: None,
                depends_on: vec![],
                image: None,
                commands: BTreeMap::new(),
                env: BTreeMap::new(),
                vars: BTreeMap::new(),
            },
        }
    }

    /// Language target defining the given literal commands as `echo <name>`.
    pub fn language(name: &str, commands: &[&str]) -> Self {
        commands
            .iter()
            .fold(Self::new(name), |b, c| b.command(c, &format!("echo {name} {c}")))
    }

    /// Auxiliary target defining the given literal commands.
    pub fn auxiliary(name: &str, commands: &[&str]) -> Self {
        Self::language(name, commands).target_type(TargetType::Auxiliary)
    }

    pub fn title(mut self, title: &str) -> Self {
        self.target.title = Some(title.to_string());
        self
    }

    pub fn target_type(mut self, target_type: TargetType) -> Self {
        self.target.target_type = target_type;
        self
    }

    pub fn directory(mut self, dir: &str) -> Self {
        self.target.directory = Some(dir.to_string());
        self
    }

    pub fn depends_on(mut self, dep: &str) -> Self {
        self.target.depends_on.push(dep.to_string());
        self
    }

    pub fn image(mut self, image: &str) -> Self {
        self.target.image = Some(image.to_string());
        self
    }

    pub fn command(mut self, name: &str, cmd: &str) -> Self {
        self.target
            .commands
            .insert(name.to_string(), Some(RawCommand::Literal(cmd.to_string())));
        self
    }

    pub fn alias(mut self, name: &str, members: &[&str]) -> Self {
        self.target.commands.insert(
            name.to_string(),
            Some(RawCommand::Alias(members.iter().map(|m| m.to_string()).collect())),
        );
        self
    }

    pub fn disabled(mut self, name: &str) -> Self {
        self.target
            .commands
            .insert(name.to_string(), Some(RawCommand::Flag(false)));
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.target.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn var(mut self, key: &str, value: &str) -> Self {
        self.target.vars.insert(key.to_string(), value.to_string());
        self
    }

    pub fn build(self) -> RawTargetConfig {
        self.target
    }
}
