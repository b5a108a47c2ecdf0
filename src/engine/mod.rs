// src/engine/mod.rs

//! Orchestration engine.
//!
//! This module ties together:
//! - the step scheduler for the requested goal's plan
//! - the cycle queue (what happens when changes arrive while a cycle runs)
//! - the main runtime event loop that reacts to:
//!   - cycle requests (startup, file changes)
//!   - step completion events
//!   - shutdown signals

pub mod queue;
pub mod runtime;

pub use queue::{CycleQueue, WhileRunningBehaviour};
pub use runtime::{
    CycleReason, RunSummary, Runtime, RuntimeEvent, RuntimeOptions, StepOutcome,
};
