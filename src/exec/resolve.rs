// src/exec/resolve.rs

//! Turning a command name into concrete shell lines for one target.
//!
//! - aliases expand, in order, to the lines of their member commands
//! - `{{ name }}` placeholders are filled from the target's `vars`, then the
//!   built-ins `target`, `title` and `directory`
//! - extra CLI arguments are shell-quoted and appended to every line

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::config::model::CommandDefinition;
use crate::errors::{MonorunError, Result};
use crate::registry::Target;

/// Nesting limit for aliases that point at aliases.
const MAX_ALIAS_DEPTH: usize = 16;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_.-]*)\s*\}\}").expect("placeholder regex is valid")
});

/// Expand `command` on `target` into the shell lines to run, in order.
pub fn resolve_command_lines(
    target: &dyn Target,
    command: &str,
    args: &[String],
) -> Result<Vec<String>> {
    let mut literals = Vec::new();
    expand(target, command, 0, &mut literals)?;

    let suffix = args.iter().map(|a| quote_arg(a)).collect::<Vec<_>>().join(" ");

    literals
        .into_iter()
        .map(|line| {
            let line = interpolate(target, &line)?;
            Ok(if suffix.is_empty() {
                line
            } else {
                format!("{line} {suffix}")
            })
        })
        .collect()
}

fn expand(target: &dyn Target, command: &str, depth: usize, out: &mut Vec<String>) -> Result<()> {
    if depth > MAX_ALIAS_DEPTH {
        return Err(MonorunError::ConfigError(format!(
            "alias '{command}' on target '{}' nests deeper than {MAX_ALIAS_DEPTH} levels (alias loop?)",
            target.name()
        )));
    }

    match target.command(command) {
        Some(CommandDefinition::Literal(line)) => {
            out.push(line.clone());
            Ok(())
        }
        Some(CommandDefinition::Alias(members)) => {
            for member in members {
                expand(target, member, depth + 1, out)?;
            }
            Ok(())
        }
        Some(CommandDefinition::Disabled) => Err(MonorunError::CommandDisabled {
            target: target.name().to_string(),
            command: command.to_string(),
        }),
        None => Err(MonorunError::UnknownCommand {
            command: command.to_string(),
            target: Some(target.name().to_string()),
        }),
    }
}

/// Replace `{{ name }}` placeholders in `line`.
pub fn interpolate(target: &dyn Target, line: &str) -> Result<String> {
    let mut missing: Option<String> = None;

    let replaced = PLACEHOLDER.replace_all(line, |caps: &Captures<'_>| {
        let key = &caps[1];
        match lookup(target, key) {
            Some(value) => value,
            None => {
                missing.get_or_insert_with(|| key.to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(variable) => Err(MonorunError::Interpolation {
            target: target.name().to_string(),
            variable,
        }),
        None => Ok(replaced.into_owned()),
    }
}

fn lookup(target: &dyn Target, key: &str) -> Option<String> {
    if let Some(v) = target.vars().get(key) {
        return Some(v.clone());
    }
    match key {
        "target" => Some(target.name().to_string()),
        "title" => Some(target.title().to_string()),
        "directory" => Some(target.directory().display().to_string()),
        _ => None,
    }
}

/// Quote `arg` for `sh` if it contains anything beyond a conservative safe set.
pub fn quote_arg(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
