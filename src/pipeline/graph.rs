// src/pipeline/graph.rs

use std::collections::HashMap;

use anyhow::{Result, anyhow};
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::pipeline::step::StepId;

/// Internal node structure: stores immediate deps and dependents.
#[derive(Debug, Clone, Default)]
struct StepNode {
    /// Direct dependencies: steps that must succeed before this one can run.
    deps: Vec<StepId>,
    /// Direct dependents: steps that depend on this one.
    dependents: Vec<StepId>,
}

/// In-memory dependency graph over the steps of one plan.
///
/// Lightweight adjacency only; acyclicity is checked separately via
/// [`StepGraph::check_acyclic`], which config validation runs for every goal.
#[derive(Debug, Clone, Default)]
pub struct StepGraph {
    nodes: HashMap<StepId, StepNode>,
    /// Insertion order, so plan printing stays stable.
    order: Vec<StepId>,
}

impl StepGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a step with its direct dependencies.
    ///
    /// Dependencies that have not been added yet get a node implicitly; the
    /// plan builder always adds them first, but the graph does not rely on it.
    pub fn add_step(&mut self, step: StepId, deps: &[StepId]) {
        for dep in deps {
            self.node_mut(*dep).dependents.push(step);
        }
        self.node_mut(step).deps.extend_from_slice(deps);
    }

    fn node_mut(&mut self, step: StepId) -> &mut StepNode {
        if !self.nodes.contains_key(&step) {
            self.order.push(step);
        }
        self.nodes.entry(step).or_default()
    }

    /// All steps of the plan, in insertion order.
    pub fn steps(&self) -> impl Iterator<Item = StepId> + '_ {
        self.order.iter().copied()
    }

    pub fn contains(&self, step: StepId) -> bool {
        self.nodes.contains_key(&step)
    }

    /// Immediate dependencies of a step.
    pub fn dependencies_of(&self, step: StepId) -> &[StepId] {
        self.nodes
            .get(&step)
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate dependents of a step.
    pub fn dependents_of(&self, step: StepId) -> &[StepId] {
        self.nodes
            .get(&step)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }

    /// Steps with no dependencies; these start a cycle.
    pub fn roots(&self) -> Vec<StepId> {
        self.order
            .iter()
            .copied()
            .filter(|s| self.dependencies_of(*s).is_empty())
            .collect()
    }

    /// Verify the graph has no cycles via topological sort.
    pub fn check_acyclic(&self) -> Result<()> {
        self.topo_order().map(|_| ())
    }

    /// Topological order of the steps (dependencies first).
    pub fn topo_order(&self) -> Result<Vec<StepId>> {
        let mut graph: DiGraphMap<StepId, ()> = DiGraphMap::new();

        for step in self.order.iter() {
            graph.add_node(*step);
        }
        for step in self.order.iter() {
            for dep in self.dependencies_of(*step) {
                graph.add_edge(*dep, *step, ());
            }
        }

        match toposort(&graph, None) {
            Ok(order) => Ok(order),
            Err(cycle) => Err(anyhow!(
                "cycle detected in step graph involving step '{}'",
                cycle.node_id()
            )),
        }
    }
}
