use std::error::Error;

use tokio::sync::mpsc;
use uibuild::engine::{
    CycleQueue, CycleReason, RunSummary, Runtime, RuntimeEvent, RuntimeOptions, StepOutcome,
    WhileRunningBehaviour,
};
use uibuild::pipeline::{Goal, Plan, ScheduledStep, Scheduler, StepId};

type TestResult = Result<(), Box<dyn Error>>;

/// Stand in for the real executor: the test consumes scheduled steps and
/// replies with completion events, so the runtime's event flow is exercised
/// without touching the filesystem.
fn spawn_runtime(
    goal: Goal,
    queue: CycleQueue,
    exit_when_idle: bool,
) -> (
    mpsc::Sender<RuntimeEvent>,
    mpsc::Receiver<ScheduledStep>,
    tokio::task::JoinHandle<anyhow::Result<RunSummary>>,
) {
    let plan = Plan::for_goal(goal);
    let scheduler = Scheduler::from_plan(&plan);
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);
    let (exec_tx, exec_rx) = mpsc::channel::<ScheduledStep>(32);

    let runtime = Runtime::new(scheduler, queue, RuntimeOptions { exit_when_idle }, rt_rx, exec_tx);
    let handle = tokio::spawn(runtime.run());

    (rt_tx, exec_rx, handle)
}

#[tokio::test]
async fn one_cycle_dispatches_phases_in_order_and_exits_when_idle() -> TestResult {
    let queue = CycleQueue::new(WhileRunningBehaviour::Queue, 1);
    let (rt_tx, mut exec_rx, handle) = spawn_runtime(Goal::Dev, queue, true);

    rt_tx
        .send(RuntimeEvent::CycleRequested {
            reason: CycleReason::Startup,
        })
        .await?;

    let mut seen = Vec::new();
    while let Some(step) = exec_rx.recv().await {
        seen.push(step.id);
        rt_tx
            .send(RuntimeEvent::StepCompleted {
                step: step.id,
                outcome: StepOutcome::Success,
            })
            .await?;
        if seen.len() == 6 {
            break;
        }
    }

    // Phase boundaries: copies first in any order, then styles + bundle in
    // any order, then deploy.
    let mut copies = seen[..3].to_vec();
    copies.sort();
    assert_eq!(copies, vec![StepId::Assets, StepId::Scripts, StepId::Compose]);
    let mut second = seen[3..5].to_vec();
    second.sort();
    assert_eq!(second, vec![StepId::Styles, StepId::Bundle]);
    assert_eq!(seen[5], StepId::Deploy);

    let summary = handle.await??;
    assert_eq!(summary.cycles_run, 1);
    assert!(summary.failed_steps.is_empty());

    Ok(())
}

#[tokio::test]
async fn changes_during_a_cycle_coalesce_into_exactly_one_follow_up() -> TestResult {
    let queue = CycleQueue::new(WhileRunningBehaviour::Queue, 1);
    let (rt_tx, mut exec_rx, handle) = spawn_runtime(Goal::Dev, queue, true);

    rt_tx
        .send(RuntimeEvent::CycleRequested {
            reason: CycleReason::Startup,
        })
        .await?;

    let mut total_deploys = 0;
    let mut completed = 0;
    while let Some(step) = exec_rx.recv().await {
        if step.id == StepId::Deploy {
            total_deploys += 1;
        }

        // Burst of file changes while the first cycle is mid-flight.
        if completed == 1 {
            for _ in 0..3 {
                rt_tx
                    .send(RuntimeEvent::CycleRequested {
                        reason: CycleReason::FileChange,
                    })
                    .await?;
            }
        }

        rt_tx
            .send(RuntimeEvent::StepCompleted {
                step: step.id,
                outcome: StepOutcome::Success,
            })
            .await?;
        completed += 1;

        if completed == 12 {
            break;
        }
    }

    let summary = handle.await??;
    assert_eq!(summary.cycles_run, 2, "three changes, one follow-up cycle");
    assert_eq!(total_deploys, 2);

    Ok(())
}

#[tokio::test]
async fn failed_copy_step_short_circuits_the_cycle() -> TestResult {
    let queue = CycleQueue::new(WhileRunningBehaviour::Queue, 1);
    let (rt_tx, mut exec_rx, handle) = spawn_runtime(Goal::Build, queue, true);

    rt_tx
        .send(RuntimeEvent::CycleRequested {
            reason: CycleReason::Startup,
        })
        .await?;

    let mut dispatched = Vec::new();
    while let Some(step) = exec_rx.recv().await {
        dispatched.push(step.id);
        let outcome = if step.id == StepId::Scripts {
            StepOutcome::Failed(2)
        } else {
            StepOutcome::Success
        };
        rt_tx
            .send(RuntimeEvent::StepCompleted {
                step: step.id,
                outcome,
            })
            .await?;
        if dispatched.len() == 3 {
            break;
        }
    }

    let summary = handle.await??;

    // Only the copy phase ran; styles and bundle were never dispatched.
    let mut copies = dispatched.clone();
    copies.sort();
    assert_eq!(copies, vec![StepId::Assets, StepId::Scripts, StepId::Compose]);
    assert!(summary.failed_steps.contains(&StepId::Scripts));
    assert!(summary.failed_steps.contains(&StepId::Styles));
    assert!(summary.failed_steps.contains(&StepId::Bundle));

    Ok(())
}

#[tokio::test]
async fn shutdown_request_stops_an_idle_watch_runtime() -> TestResult {
    let queue = CycleQueue::new(WhileRunningBehaviour::Queue, 1);
    let (rt_tx, _exec_rx, handle) = spawn_runtime(Goal::Watch, queue, false);

    rt_tx.send(RuntimeEvent::ShutdownRequested).await?;

    let summary = handle.await??;
    assert_eq!(summary.cycles_run, 0);
    assert!(summary.failed_steps.is_empty());

    Ok(())
}
