// src/config/validate.rs

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use crate::config::model::{
    CommandDefinition, ConfigFile, RawCommand, RawConfigFile, RawTargetConfig, TargetConfig,
};
use crate::errors::{MonorunError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::MonorunError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        ensure_has_targets(&raw)?;
        ensure_unique_names(&raw)?;

        let targets = raw
            .target
            .into_iter()
            .map(parse_target)
            .collect::<Result<Vec<_>>>()?;

        Ok(ConfigFile::new_unchecked(raw.config, targets))
    }
}

fn ensure_has_targets(cfg: &RawConfigFile) -> Result<()> {
    if cfg.target.is_empty() {
        return Err(MonorunError::ConfigError(
            "config must contain at least one [[target]] entry".to_string(),
        ));
    }
    Ok(())
}

fn ensure_unique_names(cfg: &RawConfigFile) -> Result<()> {
    let mut seen = HashSet::new();
    for target in cfg.target.iter() {
        if !is_directory_safe(&target.name) {
            return Err(MonorunError::ConfigError(format!(
                "target name '{}' must be non-empty and use only letters, digits, '-', '_' or '.'",
                target.name
            )));
        }
        if !seen.insert(target.name.as_str()) {
            return Err(MonorunError::ConfigError(format!(
                "target '{}' is declared more than once",
                target.name
            )));
        }
    }
    Ok(())
}

fn is_directory_safe(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn parse_target(raw: RawTargetConfig) -> Result<TargetConfig> {
    let commands = parse_commands(&raw.name, raw.commands)?;

    // Dependency references are checked by the registry, not here.
    Ok(TargetConfig {
        title: raw.title.unwrap_or_else(|| raw.name.clone()),
        directory: PathBuf::from(raw.directory.unwrap_or_else(|| raw.name.clone())),
        name: raw.name,
        target_type: raw.target_type,
        depends_on: raw.depends_on,
        image: raw.image,
        commands,
        env: raw.env,
        vars: raw.vars,
    })
}

fn parse_commands(
    target: &str,
    raw: BTreeMap<String, Option<RawCommand>>,
) -> Result<BTreeMap<String, CommandDefinition>> {
    let mut commands = BTreeMap::new();

    for (name, def) in raw.iter() {
        if name.trim().is_empty() {
            return Err(MonorunError::ConfigError(format!(
                "target '{target}' has a command with an empty name"
            )));
        }

        let parsed = match def {
            None | Some(RawCommand::Flag(false)) => CommandDefinition::Disabled,
            Some(RawCommand::Flag(true)) => {
                return Err(MonorunError::ConfigError(format!(
                    "target '{target}' command '{name}': `true` is not a command; use a string, a list of command names, or `false` to disable"
                )));
            }
            Some(RawCommand::Literal(cmd)) => {
                if cmd.trim().is_empty() {
                    return Err(MonorunError::ConfigError(format!(
                        "target '{target}' command '{name}' is an empty string"
                    )));
                }
                CommandDefinition::Literal(cmd.clone())
            }
            Some(RawCommand::Alias(members)) => {
                validate_alias(target, name, members, &raw)?;
                CommandDefinition::Alias(members.clone())
            }
        };

        commands.insert(name.clone(), parsed);
    }

    Ok(commands)
}

fn validate_alias(
    target: &str,
    name: &str,
    members: &[String],
    all: &BTreeMap<String, Option<RawCommand>>,
) -> Result<()> {
    if members.is_empty() {
        return Err(MonorunError::ConfigError(format!(
            "target '{target}' alias '{name}' must list at least one command"
        )));
    }
    for member in members {
        if member == name {
            return Err(MonorunError::ConfigError(format!(
                "target '{target}' alias '{name}' cannot refer to itself"
            )));
        }
        if !all.contains_key(member) {
            return Err(MonorunError::ConfigError(format!(
                "target '{target}' alias '{name}' refers to unknown command '{member}'"
            )));
        }
    }
    Ok(())
}
