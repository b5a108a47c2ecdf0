// src/exec/executor.rs

use std::fs;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use globset::{Glob, GlobSet, GlobSetBuilder};
use tokio::sync::mpsc;
use tokio::task;
use tracing::{debug, error, info};

use crate::engine::{RuntimeEvent, StepOutcome};
use crate::errors::{Result, UibuildError};
use crate::exec::context::BuildContext;
use crate::exec::copy::copy_tree;
use crate::exec::tools::{fill_template, run_tool};
use crate::pipeline::{ScheduledStep, StepId};

/// Spawn the background executor loop.
///
/// The returned `mpsc::Sender<ScheduledStep>` is what the runtime uses as
/// `exec_tx` in `engine::Runtime`. Each scheduled step runs in its own Tokio
/// task, so steps of the same phase execute in parallel.
pub fn spawn_executor(
    ctx: Arc<BuildContext>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> mpsc::Sender<ScheduledStep> {
    let (tx, mut rx) = mpsc::channel::<ScheduledStep>(32);

    tokio::spawn(async move {
        info!("executor loop started");
        while let Some(step) = rx.recv().await {
            let ctx = Arc::clone(&ctx);
            let runtime_tx = runtime_tx.clone();
            tokio::spawn(async move {
                run_step_reporting(ctx, step.id, runtime_tx).await;
            });
        }
        info!("executor loop finished (channel closed)");
    });

    tx
}

/// Run a single step and report its outcome as a `StepCompleted` event.
///
/// Tool failures keep their exit code; every other error maps to exit code 1.
async fn run_step_reporting(
    ctx: Arc<BuildContext>,
    step: StepId,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) {
    let outcome = match run_step(&ctx, step).await {
        Ok(()) => StepOutcome::Success,
        Err(UibuildError::ToolFailed { code, .. }) => StepOutcome::Failed(code),
        Err(err) => {
            error!(step = %step, error = %err, "step execution error");
            StepOutcome::Failed(1)
        }
    };

    let _ = runtime_tx
        .send(RuntimeEvent::StepCompleted { step, outcome })
        .await;
}

/// Execute the built-in work behind one step.
pub async fn run_step(ctx: &BuildContext, step: StepId) -> Result<()> {
    info!(step = %step, "starting step");
    match step {
        StepId::Assets => {
            copy_tree_blocking(ctx.resources_dir.clone(), ctx.output_root.clone(), None).await?;
        }
        StepId::Scripts => {
            let scripts_only = globset_of(&["**/*.js"])?;
            copy_tree_blocking(
                ctx.scripts_dir.clone(),
                ctx.output_root.clone(),
                Some(scripts_only),
            )
            .await?;
        }
        StepId::Compose => {
            // The compose dir is generated by an upstream build; absent means
            // nothing to copy.
            if !ctx.compose_dir.is_dir() {
                debug!(dir = ?ctx.compose_dir, "compose directory absent; nothing to copy");
                return Ok(());
            }
            copy_tree_blocking(ctx.compose_dir.clone(), ctx.output_root.clone(), None).await?;
        }
        StepId::Styles => {
            for (src, dest) in ctx.style_entries.iter() {
                if !src.is_file() {
                    debug!(entry = ?src, "stylesheet entry absent; skipping");
                    continue;
                }
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("creating directory {:?}", parent))?;
                }
                let cmd = fill_template(
                    &ctx.styles_cmd,
                    &[
                        ("src", &src.to_string_lossy()),
                        ("dest", &dest.to_string_lossy()),
                    ],
                );
                run_tool(step, &cmd, &ctx.project_root).await?;
            }
        }
        StepId::Bundle => {
            if !ctx.bundle_entry.is_file() {
                debug!(entry = ?ctx.bundle_entry, "bundle entry absent; skipping");
                return Ok(());
            }
            write_module_map(ctx)?;
            let cmd = fill_template(
                &ctx.bundle_cmd,
                &[
                    ("root", &ctx.output_root.to_string_lossy()),
                    ("entry", &ctx.bundle_entry.to_string_lossy()),
                    ("out", &ctx.bundle_out.to_string_lossy()),
                    ("exclude", &ctx.bundle_exclude.join(",")),
                ],
            );
            run_tool(step, &cmd, &ctx.project_root).await?;
        }
        StepId::Lint => {
            run_tool(step, &ctx.lint_cmd, &ctx.project_root).await?;
        }
        StepId::Deploy => {
            if !ctx.output_root.is_dir() {
                return Err(UibuildError::MissingOutputRoot(ctx.output_root.clone()));
            }
            copy_tree_blocking(ctx.output_root.clone(), ctx.deploy_dir.clone(), None).await?;
        }
    }

    Ok(())
}

/// Tree copies are plain blocking filesystem work; keep them off the runtime
/// threads.
async fn copy_tree_blocking(
    src: std::path::PathBuf,
    dest: std::path::PathBuf,
    include: Option<GlobSet>,
) -> Result<u64> {
    task::spawn_blocking(move || copy_tree(&src, &dest, include.as_ref()))
        .await
        .map_err(|e| UibuildError::Other(anyhow!("copy task panicked: {e}")))?
}

/// Serialize the opaque module-alias table next to the bundle output.
fn write_module_map(ctx: &BuildContext) -> Result<()> {
    if ctx.modules.is_empty() {
        return Ok(());
    }
    let path = ctx.module_map_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating directory {:?}", parent))?;
    }
    let json = serde_json::to_string_pretty(&ctx.modules)
        .context("serializing module-alias table")?;
    fs::write(&path, json).with_context(|| format!("writing module map to {:?}", path))?;
    debug!(path = ?path, "wrote module-alias table");
    Ok(())
}

fn globset_of(patterns: &[&str]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat)
            .map_err(|e| UibuildError::Config(format!("invalid glob pattern {pat}: {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| UibuildError::Config(format!("building globset: {e}")))
}
