// src/exec/mod.rs

//! Step execution layer.
//!
//! This module owns the actual work behind every [`StepId`]: glob-aware tree
//! copies for the asset/script/compose/deploy steps, and external commands
//! (style compiler, bundler, linter) through `tokio::process::Command`.
//! Completion is reported back to the orchestration runtime via
//! `RuntimeEvent`s.
//!
//! - [`executor`] owns the executor loop which consumes `ScheduledStep`s.
//! - [`context`] resolves config paths into a ready-to-use [`BuildContext`].
//! - [`copy`] implements the content-hash-aware tree copy.
//! - [`tools`] runs the external transform commands.
//!
//! [`StepId`]: crate::pipeline::StepId

pub mod context;
pub mod copy;
pub mod executor;
pub mod tools;

pub use context::BuildContext;
pub use executor::spawn_executor;
