// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::pipeline::Goal;

/// Command-line arguments for `uibuild`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "uibuild",
    version,
    about = "Assemble, deploy and watch the UI asset pipeline.",
    long_about = None
)]
pub struct CliArgs {
    /// Goal to run.
    ///
    /// Default: `dev` (build, deploy, then watch), matching the pipeline's
    /// default task.
    #[arg(value_enum, value_name = "GOAL", default_value_t = Goal::Dev)]
    pub goal: Goal,

    /// Path to the config file (TOML).
    ///
    /// Default: `Uibuild.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Uibuild.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `UIBUILD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate config, print the step plan, but don't execute anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
