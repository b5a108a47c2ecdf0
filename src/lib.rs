// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod pipeline;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Result, anyhow};
use tokio::sync::mpsc;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::loader::load_or_default;
use crate::config::model::ConfigFile;
use crate::engine::{
    CycleQueue, CycleReason, Runtime, RuntimeEvent, RuntimeOptions, WhileRunningBehaviour,
};
use crate::exec::BuildContext;
use crate::pipeline::{Plan, Scheduler};
use crate::watch::build_watch_profile;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the goal's step plan, scheduler and cycle queue
/// - the step executor
/// - (for watching goals) the file watcher
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_or_default(&config_path)?;
    let goal = args.goal;

    if args.dry_run {
        print_dry_run(&cfg, goal)?;
        return Ok(());
    }

    let root = config_root_dir(&config_path);
    let ctx = Arc::new(BuildContext::new(&cfg, &root));

    // Plan + scheduler for the requested goal.
    let plan = Plan::for_goal(goal);
    let scheduler = Scheduler::from_plan(&plan);

    // Queue behaviour from [watch].
    let behaviour: WhileRunningBehaviour = cfg
        .watch
        .while_running
        .parse()
        .map_err(|e: String| anyhow!(e))?;
    let queue = CycleQueue::new(behaviour, cfg.watch.queue_length);

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    // Step executor.
    let exec_tx = exec::spawn_executor(Arc::clone(&ctx), rt_tx.clone());

    // File watcher, only for watching goals.
    let _watcher_handle = if goal.watches() {
        let profile = build_watch_profile(&cfg)?;
        Some(watch::spawn_watcher(root, profile, rt_tx.clone())?)
    } else {
        None
    };

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    // Seed the initial cycle (`watch` only reacts to change events).
    if goal.runs_initial_cycle() {
        info!(goal = %goal, "requesting initial cycle");
        rt_tx
            .send(RuntimeEvent::CycleRequested {
                reason: CycleReason::Startup,
            })
            .await?;
    }

    let options = RuntimeOptions {
        exit_when_idle: !goal.watches(),
    };

    let runtime = Runtime::new(scheduler, queue, options, rt_rx, exec_tx);
    let summary = runtime.run().await?;

    if summary.failed_steps.is_empty() {
        Ok(())
    } else {
        Err(anyhow!(
            "goal '{}' failed; failed steps: {}",
            goal,
            summary
                .failed_steps
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }
}

/// Figure out a sensible project root.
/// Currently: directory containing the config file, or `.`.
fn config_root_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Simple dry-run output: print the goal's steps in dependency order.
fn print_dry_run(cfg: &ConfigFile, goal: pipeline::Goal) -> Result<()> {
    let plan = Plan::for_goal(goal);
    let order = plan.graph().topo_order()?;

    println!("uibuild dry-run");
    println!("  goal: {goal}");
    println!("  output_root: {}", cfg.project.output_root);
    println!("  deploy_dir: {}", cfg.project.deploy_dir);
    println!();

    println!("steps ({}):", order.len());
    for step in order {
        let deps = plan.graph().dependencies_of(step);
        if deps.is_empty() {
            println!("  - {step}");
        } else {
            println!(
                "  - {step} (after: {})",
                deps.iter()
                    .map(|d| d.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
    if goal.watches() {
        println!();
        println!("then: watch sources and re-run build + deploy on change");
    }

    Ok(())
}
