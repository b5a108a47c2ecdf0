// src/engine/runtime.rs

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::engine::queue::CycleQueue;
use crate::pipeline::scheduler::{ScheduledStep, Scheduler};
use crate::pipeline::step::StepId;

/// Why a cycle was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleReason {
    Startup,
    FileChange,
}

/// Result of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Success,
    Failed(i32), // exit code
}

/// Events sent into the runtime from the watcher, executor, or external
/// signals.
///
/// - `lib.rs` sends one `CycleRequested` at startup (except for pure watch)
/// - the watcher sends `CycleRequested` on matching file changes
/// - the executor sends `StepCompleted`
/// - Ctrl-C handling sends `ShutdownRequested`
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    CycleRequested { reason: CycleReason },
    StepCompleted { step: StepId, outcome: StepOutcome },
    ShutdownRequested,
}

/// Options that influence how the runtime behaves.
#[derive(Debug, Clone, Default)]
pub struct RuntimeOptions {
    /// If true, exit as soon as there is nothing left to run and no queued
    /// cycles. In watch mode this is `false`.
    pub exit_when_idle: bool,
}

/// What happened over the runtime's lifetime, reported back to `lib.rs` so it
/// can derive the process exit code.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub cycles_run: u64,
    /// Steps that failed in the most recent cycle. Non-empty means the
    /// requested chain failed (fail-fast, no retries).
    pub failed_steps: Vec<StepId>,
}

/// The main orchestration runtime.
///
/// Responsibilities:
/// - Consume `RuntimeEvent`s from the watcher / executor / signal handler.
/// - Apply queue semantics for changes that arrive mid-cycle.
/// - Drive the step scheduler; never overlap two cycles.
/// - Send `ScheduledStep`s to the executor when steps are ready.
pub struct Runtime {
    scheduler: Scheduler,
    queue: CycleQueue,
    options: RuntimeOptions,

    /// Unified event stream from all producers.
    events_rx: mpsc::Receiver<RuntimeEvent>,

    /// Channel to the executor: whenever the scheduler marks a step as ready,
    /// it is sent here.
    exec_tx: mpsc::Sender<ScheduledStep>,

    cycles_run: u64,
}

impl Runtime {
    pub fn new(
        scheduler: Scheduler,
        queue: CycleQueue,
        options: RuntimeOptions,
        events_rx: mpsc::Receiver<RuntimeEvent>,
        exec_tx: mpsc::Sender<ScheduledStep>,
    ) -> Self {
        Self {
            scheduler,
            queue,
            options,
            events_rx,
            exec_tx,
            cycles_run: 0,
        }
    }

    /// Main event loop.
    ///
    /// Runs until shutdown is requested, or (with `exit_when_idle`) until the
    /// scheduler is idle with nothing queued.
    pub async fn run(mut self) -> Result<RunSummary> {
        info!("uibuild runtime started");

        while let Some(event) = self.events_rx.recv().await {
            debug!(?event, "runtime received event");

            let keep_running = match event {
                RuntimeEvent::CycleRequested { reason } => self.handle_cycle_request(reason).await?,
                RuntimeEvent::StepCompleted { step, outcome } => {
                    self.handle_step_completion(step, outcome).await?
                }
                RuntimeEvent::ShutdownRequested => {
                    info!("shutdown requested, stopping runtime");
                    false
                }
            };

            if !keep_running {
                break;
            }
        }

        info!("uibuild runtime exiting");
        Ok(RunSummary {
            cycles_run: self.cycles_run,
            failed_steps: self.scheduler.failed_steps().to_vec(),
        })
    }

    /// Handle a cycle request (startup or file change).
    ///
    /// A request arriving while a cycle is active is delegated to the queue;
    /// cycles never overlap.
    async fn handle_cycle_request(&mut self, reason: CycleReason) -> Result<bool> {
        info!(?reason, "cycle requested");

        if self.scheduler.is_idle() {
            self.start_new_cycle().await?;
        } else {
            self.queue.record_change();
            debug!("cycle already running; change recorded in queue");
        }

        Ok(true)
    }

    /// Handle completion of a step.
    ///
    /// Failures cause dependents to be skipped for the rest of the cycle;
    /// that is handled inside `Scheduler::handle_completion`.
    async fn handle_step_completion(&mut self, step: StepId, outcome: StepOutcome) -> Result<bool> {
        match outcome {
            StepOutcome::Success => info!(step = %step, "step completed successfully"),
            StepOutcome::Failed(code) => {
                warn!(step = %step, exit_code = code, "step failed");
            }
        }

        let newly_ready = self.scheduler.handle_completion(step, outcome);
        self.dispatch_ready_steps(newly_ready).await?;

        if self.scheduler.is_idle() {
            if self.scheduler.cycle_failed() {
                warn!(
                    failed = ?self.scheduler.failed_steps(),
                    "cycle finished with failures"
                );
            }

            if self.queue.pop_pending() {
                info!("starting queued cycle");
                self.start_new_cycle().await?;
            } else if self.options.exit_when_idle {
                info!("runtime idle and exit_when_idle=true, stopping");
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Start a brand-new cycle over the whole plan.
    async fn start_new_cycle(&mut self) -> Result<()> {
        self.cycles_run += 1;
        let ready = self.scheduler.start_new_cycle();
        self.dispatch_ready_steps(ready).await
    }

    /// Send all ready steps to the executor.
    async fn dispatch_ready_steps(&mut self, steps: Vec<ScheduledStep>) -> Result<()> {
        for step in steps {
            debug!(step = %step.id, "dispatching step to executor");
            if let Err(err) = self.exec_tx.send(step).await {
                error!(error = %err, "failed to send step to executor");
                // If the executor channel is closed, there's not much we can
                // do; bubble up so higher layers can decide.
                return Err(err.into());
            }
        }
        Ok(())
    }
}
