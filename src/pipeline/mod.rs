// src/pipeline/mod.rs

//! Step plans and scheduling.
//!
//! - [`step`] defines the fixed set of pipeline steps and the per-goal plans
//!   that wire them together.
//! - [`graph`] holds the dependency adjacency for a plan.
//! - [`scheduler`] contains the per-cycle state machine that decides which
//!   steps are ready to run, and when dependents can be scheduled.

pub mod graph;
pub mod scheduler;
pub mod step;

pub use graph::StepGraph;
pub use scheduler::{ScheduledStep, Scheduler};
pub use step::{Goal, Plan, StepId};
