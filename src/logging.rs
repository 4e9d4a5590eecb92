// src/logging.rs

//! Diagnostics for `monorun`.
//!
//! Target commands inherit stdout, and `--format json` reports are printed
//! there too, so every `tracing` event goes to stderr. The level is
//! `--log-level` if given, else `MONORUN_LOG`, else `warn`; at `warn` a
//! normal run only shows notices (empty type filter, cancellation) and
//! target failures.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

const LOG_ENV: &str = "MONORUN_LOG";

/// Install the stderr subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV).ok();
    let level = resolve_level(cli_level, env_value.as_deref());

    fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    Ok(())
}

/// Flag beats environment; an unparsable environment value is ignored.
fn resolve_level(cli_level: Option<LogLevel>, env_value: Option<&str>) -> Level {
    cli_level
        .map(Level::from)
        .or_else(|| env_value.and_then(parse_level_str))
        .unwrap_or(Level::WARN)
}

impl From<LogLevel> for Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_environment() {
        assert_eq!(resolve_level(Some(LogLevel::Debug), Some("error")), Level::DEBUG);
        assert_eq!(resolve_level(None, Some(" Warning ")), Level::WARN);
        assert_eq!(resolve_level(None, Some("info")), Level::INFO);
    }

    #[test]
    fn unknown_or_missing_environment_falls_back_to_warn() {
        assert_eq!(resolve_level(None, Some("verbose")), Level::WARN);
        assert_eq!(resolve_level(None, None), Level::WARN);
    }
}
