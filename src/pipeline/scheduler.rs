// src/pipeline/scheduler.rs

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::engine::StepOutcome;
use crate::pipeline::graph::StepGraph;
use crate::pipeline::step::{Plan, StepId};

/// Per-cycle state of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CycleState {
    /// Step is part of this cycle but waiting on dependencies.
    Pending,
    /// Step has been dispatched to the executor and is currently running.
    Running,
    /// Step completed successfully for this cycle.
    DoneSuccess,
    /// Step failed in this cycle (or was blocked by a failed dependency).
    DoneFailed,
}

/// Description of a step the scheduler wants the executor to run now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledStep {
    pub id: StepId,
}

/// Scheduler holds the immutable plan graph plus mutable per-cycle state.
///
/// It is responsible for:
/// - deciding when a step is ready to run (all deps succeeded)
/// - marking steps as succeeded/failed
/// - failing dependents transitively when a step fails (fail-fast, no retry)
/// - detecting the end of a cycle and whether it failed
///
/// Every cycle runs the whole plan; there is no cross-cycle memoisation. A
/// change batch always means a full build + deploy pass.
pub struct Scheduler {
    graph: StepGraph,
    states: HashMap<StepId, Option<CycleState>>,

    /// Monotonically increasing cycle ID.
    cycle_counter: u64,
    /// Currently active cycle ID, or `None` when idle.
    current_cycle_id: Option<u64>,
    /// Steps that failed during the current (or most recent) cycle.
    failed_steps: Vec<StepId>,
}

impl Scheduler {
    /// Construct a scheduler over a goal's [`Plan`].
    pub fn from_plan(plan: &Plan) -> Self {
        let graph = plan.graph().clone();
        let states = graph.steps().map(|s| (s, None)).collect();

        Self {
            graph,
            states,
            cycle_counter: 0,
            current_cycle_id: None,
            failed_steps: Vec::new(),
        }
    }

    /// Returns `true` if there is currently no active cycle.
    pub fn is_idle(&self) -> bool {
        self.current_cycle_id.is_none()
    }

    /// Whether the most recent cycle had any failed step.
    pub fn cycle_failed(&self) -> bool {
        !self.failed_steps.is_empty()
    }

    /// Steps that failed in the most recent cycle.
    pub fn failed_steps(&self) -> &[StepId] {
        &self.failed_steps
    }

    /// Start a new cycle: every plan step becomes `Pending`, and steps whose
    /// dependencies are already satisfied (the roots) are returned for
    /// dispatch.
    pub fn start_new_cycle(&mut self) -> Vec<ScheduledStep> {
        self.cycle_counter += 1;
        self.current_cycle_id = Some(self.cycle_counter);
        self.failed_steps.clear();

        for state in self.states.values_mut() {
            *state = Some(CycleState::Pending);
        }

        debug!(cycle_id = self.cycle_counter, "scheduler: starting new cycle");

        self.collect_new_ready_steps()
    }

    /// Handle completion of a step with a concrete outcome.
    ///
    /// - On success, dependents whose dependencies are now all satisfied are
    ///   returned for dispatch.
    /// - On failure, all transitive dependents still pending in this cycle
    ///   are marked failed as well; nothing new is dispatched downstream.
    pub fn handle_completion(&mut self, step: StepId, outcome: StepOutcome) -> Vec<ScheduledStep> {
        if self.current_cycle_id.is_none() {
            warn!(step = %step, "handle_completion called with no active cycle; ignoring");
            return Vec::new();
        }

        let mut newly_ready = Vec::new();

        match self.states.get_mut(&step) {
            Some(state) => match outcome {
                StepOutcome::Success => {
                    *state = Some(CycleState::DoneSuccess);
                    debug!(step = %step, "step completed successfully");
                    newly_ready.extend(self.collect_new_ready_steps());
                }
                StepOutcome::Failed(code) => {
                    *state = Some(CycleState::DoneFailed);
                    self.failed_steps.push(step);
                    warn!(
                        step = %step,
                        exit_code = code,
                        "step failed; failing dependents in this cycle"
                    );
                    self.mark_dependents_failed(step);
                }
            },
            None => {
                warn!(step = %step, "completion for step outside the plan; ignoring");
            }
        }

        self.maybe_finish_cycle();
        newly_ready
    }

    /// Determine whether all steps are in a terminal state and clear
    /// `current_cycle_id` if so.
    fn maybe_finish_cycle(&mut self) {
        if self.current_cycle_id.is_none() {
            return;
        }

        let any_active = self.states.values().any(|state| {
            matches!(
                state,
                Some(CycleState::Pending) | Some(CycleState::Running)
            )
        });

        if !any_active {
            info!(
                cycle_id = self.current_cycle_id,
                failed = self.failed_steps.len(),
                "scheduler: all steps terminal; cycle finished"
            );
            self.current_cycle_id = None;
        }
    }

    /// Collect steps that are `Pending` with all dependencies `DoneSuccess`,
    /// mark them `Running`, and return them for dispatch.
    fn collect_new_ready_steps(&mut self) -> Vec<ScheduledStep> {
        // Decide first, then mutate, to avoid borrowing conflicts.
        let candidates: Vec<StepId> = self
            .states
            .iter()
            .filter_map(|(step, state)| {
                if matches!(state, Some(CycleState::Pending)) && self.deps_satisfied(*step) {
                    Some(*step)
                } else {
                    None
                }
            })
            .collect();

        let mut ready = Vec::new();
        for step in candidates {
            if let Some(state) = self.states.get_mut(&step) {
                debug!(step = %step, "dependencies satisfied; marking Running");
                *state = Some(CycleState::Running);
                ready.push(ScheduledStep { id: step });
            }
        }

        ready
    }

    /// All dependencies of `step` have `DoneSuccess` state in this cycle.
    fn deps_satisfied(&self, step: StepId) -> bool {
        self.graph.dependencies_of(step).iter().all(|dep| {
            matches!(
                self.states.get(dep),
                Some(Some(CycleState::DoneSuccess))
            )
        })
    }

    /// Mark all transitive dependents of a failed step as `DoneFailed` for
    /// this cycle, so the enclosing phase aborts without dispatching them.
    fn mark_dependents_failed(&mut self, failed_step: StepId) {
        let mut stack: Vec<StepId> = self.graph.dependents_of(failed_step).to_vec();

        while let Some(step) = stack.pop() {
            if let Some(state) = self.states.get_mut(&step) {
                match state {
                    Some(CycleState::Pending) | Some(CycleState::Running) => {
                        *state = Some(CycleState::DoneFailed);
                        self.failed_steps.push(step);
                        debug!(
                            step = %step,
                            "marking dependent as failed due to upstream failure"
                        );
                        stack.extend(self.graph.dependents_of(step).iter().copied());
                    }
                    // Already terminal.
                    Some(CycleState::DoneSuccess) | Some(CycleState::DoneFailed) | None => {}
                }
            }
        }
    }
}
