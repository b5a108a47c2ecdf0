// src/engine/queue.rs

use std::str::FromStr;

use tracing::debug;

/// Behaviour when a change batch arrives while a build + deploy cycle is
/// already in progress. An in-flight cycle is never cancelled either way.
///
/// - `Queue`: remember the change and run one full cycle per remembered batch
///   after the current cycle finishes (default behaviour).
/// - `Drop`: ignore changes that arrive mid-cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhileRunningBehaviour {
    #[default]
    Queue,
    Drop,
}

impl FromStr for WhileRunningBehaviour {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "queue" => Ok(WhileRunningBehaviour::Queue),
            "drop" => Ok(WhileRunningBehaviour::Drop),
            other => Err(format!(
                "invalid while_running behaviour: {other} (expected \"queue\" or \"drop\")"
            )),
        }
    }
}

/// Queue of cycles requested while one is already executing.
///
/// A cycle always runs the whole plan, so pending entries carry no payload;
/// the queue only remembers *how many* follow-up cycles are owed, capped at
/// `max_pending`. With the default `max_pending = 1`, any number of change
/// batches during a running cycle coalesce into exactly one follow-up cycle.
#[derive(Debug)]
pub struct CycleQueue {
    behaviour: WhileRunningBehaviour,
    max_pending: usize,
    pending: usize,
}

impl CycleQueue {
    /// `max_pending` is clamped to at least 1, as a zero-length queue would
    /// make queuing semantics meaningless.
    pub fn new(behaviour: WhileRunningBehaviour, max_pending: usize) -> Self {
        Self {
            behaviour,
            max_pending: max_pending.max(1),
            pending: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending == 0
    }

    pub fn behaviour(&self) -> WhileRunningBehaviour {
        self.behaviour
    }

    /// Record a change batch that arrived while a cycle was running.
    pub fn record_change(&mut self) {
        match self.behaviour {
            WhileRunningBehaviour::Queue => {
                if self.pending < self.max_pending {
                    self.pending += 1;
                    debug!(pending = self.pending, "queued follow-up cycle");
                } else {
                    debug!(
                        pending = self.pending,
                        "pending cycles at max; coalescing change into last batch"
                    );
                }
            }
            WhileRunningBehaviour::Drop => {
                debug!("dropping change that arrived mid-cycle (drop mode)");
            }
        }
    }

    /// Take one pending cycle, if any. Called by the runtime when the current
    /// cycle finishes.
    pub fn pop_pending(&mut self) -> bool {
        if self.pending > 0 {
            self.pending -= 1;
            debug!(remaining = self.pending, "starting queued follow-up cycle");
            true
        } else {
            false
        }
    }
}
