use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of target.
///
/// - `Language`: a package built by a language toolchain (the default).
/// - `Auxiliary`: supporting assets such as container images or docs bundles.
///   These are not expected to define `test`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    #[default]
    Language,
    Auxiliary,
}

impl TargetType {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetType::Language => "language",
            TargetType::Auxiliary => "auxiliary",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "language" => Ok(TargetType::Language),
            "auxiliary" => Ok(TargetType::Auxiliary),
            other => Err(format!(
                "invalid target type: {other} (expected \"language\" or \"auxiliary\")"
            )),
        }
    }
}

/// How chatty command execution should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Discard command stdout.
    Quiet,
    #[default]
    Normal,
    /// Echo each resolved command line before running it.
    Verbose,
}

impl FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quiet" => Ok(Verbosity::Quiet),
            "normal" => Ok(Verbosity::Normal),
            "verbose" => Ok(Verbosity::Verbose),
            other => Err(format!(
                "invalid verbosity: {other} (expected \"quiet\", \"normal\" or \"verbose\")"
            )),
        }
    }
}

/// Which fixed phase list a CI pipeline uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineKind {
    #[default]
    Standard,
    /// Same as `Standard`, but builds with `build:release`.
    Release,
}
