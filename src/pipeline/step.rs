// src/pipeline/step.rs

use std::fmt;

use clap::ValueEnum;

use crate::pipeline::graph::StepGraph;

/// The fixed set of pipeline steps.
///
/// Each step is a built-in unit of work; the wiring between them is decided
/// per [`Goal`] by [`Plan::for_goal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StepId {
    /// Copy static resources into the output root.
    Assets,
    /// Copy script sources into the output root.
    Scripts,
    /// Copy the generated compose directory into the output root.
    Compose,
    /// Compile stylesheet entries inside the output root.
    Styles,
    /// Bundle the module graph from the entry script.
    Bundle,
    /// Run the lint command over the sources.
    Lint,
    /// Copy the output root into the deploy directory.
    Deploy,
}

impl StepId {
    pub fn as_str(self) -> &'static str {
        match self {
            StepId::Assets => "assets",
            StepId::Scripts => "scripts",
            StepId::Compose => "compose",
            StepId::Styles => "styles",
            StepId::Bundle => "bundle",
            StepId::Lint => "lint",
            StepId::Deploy => "deploy",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level goals as invoked from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Goal {
    /// Assemble the output root (copy phase, then styles + bundle).
    Build,
    /// Copy the output root to the deploy directory.
    Deploy,
    /// Watch sources and run build + deploy on every change batch.
    Watch,
    /// Build, deploy, then watch. The default.
    Dev,
    /// Lint, then build.
    Prod,
    /// Lint only.
    Eslint,
}

impl Goal {
    pub const ALL: [Goal; 6] = [
        Goal::Build,
        Goal::Deploy,
        Goal::Watch,
        Goal::Dev,
        Goal::Prod,
        Goal::Eslint,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Goal::Build => "build",
            Goal::Deploy => "deploy",
            Goal::Watch => "watch",
            Goal::Dev => "dev",
            Goal::Prod => "prod",
            Goal::Eslint => "eslint",
        }
    }

    /// Whether this goal enters watch mode after (optionally) running its
    /// initial cycle.
    pub fn watches(self) -> bool {
        matches!(self, Goal::Watch | Goal::Dev)
    }

    /// Whether this goal runs one cycle at startup. `watch` only reacts to
    /// change events; everything else starts with a cycle.
    pub fn runs_initial_cycle(self) -> bool {
        !matches!(self, Goal::Watch)
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A goal's step plan: the steps that participate in one cycle and the
/// dependency edges between them.
#[derive(Debug, Clone)]
pub struct Plan {
    goal: Goal,
    graph: StepGraph,
}

impl Plan {
    /// Build the plan for a goal.
    ///
    /// The `build` wiring mirrors the original pipeline: the three copy steps
    /// run concurrently, and styles + bundle each wait on all of them (join
    /// barrier between the two phases). `prod` prefixes lint as a dependency
    /// of every copy step, so a lint violation aborts before any build work.
    /// `dev`/`watch` cycles append deploy behind styles + bundle.
    pub fn for_goal(goal: Goal) -> Self {
        let copy_phase = [StepId::Assets, StepId::Scripts, StepId::Compose];
        let mut graph = StepGraph::new();

        match goal {
            Goal::Eslint => {
                graph.add_step(StepId::Lint, &[]);
            }
            Goal::Deploy => {
                graph.add_step(StepId::Deploy, &[]);
            }
            Goal::Build => {
                for step in copy_phase {
                    graph.add_step(step, &[]);
                }
                graph.add_step(StepId::Styles, &copy_phase);
                graph.add_step(StepId::Bundle, &copy_phase);
            }
            Goal::Prod => {
                graph.add_step(StepId::Lint, &[]);
                for step in copy_phase {
                    graph.add_step(step, &[StepId::Lint]);
                }
                graph.add_step(StepId::Styles, &copy_phase);
                graph.add_step(StepId::Bundle, &copy_phase);
            }
            Goal::Dev | Goal::Watch => {
                for step in copy_phase {
                    graph.add_step(step, &[]);
                }
                graph.add_step(StepId::Styles, &copy_phase);
                graph.add_step(StepId::Bundle, &copy_phase);
                graph.add_step(StepId::Deploy, &[StepId::Styles, StepId::Bundle]);
            }
        }

        Self { goal, graph }
    }

    pub fn goal(&self) -> Goal {
        self.goal
    }

    pub fn graph(&self) -> &StepGraph {
        &self.graph
    }
}
