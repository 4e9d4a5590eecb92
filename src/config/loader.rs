// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{MonorunError, Result};

/// File names probed, in order, when no `--config` is given.
pub const DEFAULT_CONFIG_NAMES: [&str; 2] = ["Monorun.toml", "monorun.json"];

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// `.json` files are parsed as JSON, everything else as TOML. This only
/// performs deserialization; use [`load_and_validate`] for semantic checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let config: RawConfigFile = if is_json {
        serde_json::from_str(&contents)?
    } else {
        toml::from_str(&contents)?
    };

    Ok(config)
}

/// Load a configuration file from path and validate it.
///
/// - Reads TOML or JSON.
/// - Applies defaults and parses command definitions.
/// - Resolves every target directory against the config file's directory
///   and checks that it exists.
///
/// Dependency references and acyclicity are checked later, when the
/// [`Registry`](crate::registry::Registry) is built.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let raw_config = load_from_path(path)?;
    let mut config = ConfigFile::try_from(raw_config)?;

    let root = config_root_dir(path);
    config.resolve_directories(&root);
    ensure_directories_exist(&config)?;

    debug!(
        path = %path.display(),
        targets = config.targets.len(),
        "configuration loaded"
    );
    Ok(config)
}

fn ensure_directories_exist(cfg: &ConfigFile) -> Result<()> {
    for target in cfg.targets.iter() {
        if !target.directory.is_dir() {
            return Err(MonorunError::ConfigError(format!(
                "directory '{}' for target '{}' does not exist",
                target.directory.display(),
                target.name
            )));
        }
    }
    Ok(())
}

/// Resolve the config path to use when none was given on the command line.
///
/// Returns the first of [`DEFAULT_CONFIG_NAMES`] that exists in `dir`, or
/// the TOML name if none does (so the error message names a sensible file).
pub fn default_config_path(dir: &Path) -> PathBuf {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
        .unwrap_or_else(|| dir.join(DEFAULT_CONFIG_NAMES[0]))
}

/// Directory that target directories are relative to.
///
/// - "configs/Monorun.toml" -> "configs"
/// - "Monorun.toml" (empty parent) -> current working directory
pub fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
