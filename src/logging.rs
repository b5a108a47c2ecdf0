// src/logging.rs

//! Tracing setup. The level comes from `--log-level` when given, otherwise
//! from the `UIBUILD_LOG` environment variable, otherwise `info`.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Install the global subscriber. Call once, before any step runs.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    fmt()
        .with_max_level(resolve_level(cli_level))
        .with_target(false)
        .compact()
        .init();

    Ok(())
}

fn resolve_level(cli_level: Option<LogLevel>) -> Level {
    if let Some(lvl) = cli_level {
        return match lvl {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        };
    }

    std::env::var("UIBUILD_LOG")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(Level::INFO)
}
