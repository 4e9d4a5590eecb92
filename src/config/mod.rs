// src/config/mod.rs

//! Configuration loading and validation for monorun.
//!
//! - `model.rs`: the serde-backed data model, raw and validated.
//! - `loader.rs`: reading TOML/JSON from disk and default path discovery.
//! - `validate.rs`: turning a raw file into a [`ConfigFile`].

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{
    CommandDefinition, ConfigFile, ConfigSection, RawCommand, RawConfigFile, RawTargetConfig,
    TargetConfig,
};
