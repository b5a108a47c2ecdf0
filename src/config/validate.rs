// src/config/validate.rs

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use globset::Glob;

use crate::config::model::ConfigFile;
use crate::engine::WhileRunningBehaviour;
use crate::pipeline::{Goal, Plan};

/// Run semantic validation against a loaded configuration.
///
/// This checks:
/// - output root and deploy dir are set and distinct from each other and
///   from every source directory
/// - stylesheet entries are non-empty on both sides
/// - tool command templates carry the placeholders the executor substitutes
/// - `[watch]` behaviour string, queue length and exclude globs
/// - every goal's step graph is acyclic (toposort)
///
/// It does **not** check that any of the referenced directories exist; that
/// is a per-step runtime concern (the compose dir, for instance, may appear
/// only after an upstream build).
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    validate_paths(cfg)?;
    validate_styles(cfg)?;
    validate_tools(cfg)?;
    validate_watch(cfg)?;
    validate_plans(cfg)?;
    Ok(())
}

fn validate_paths(cfg: &ConfigFile) -> Result<()> {
    if cfg.project.output_root.trim().is_empty() {
        return Err(anyhow!("[project].output_root must not be empty"));
    }
    if cfg.project.deploy_dir.trim().is_empty() {
        return Err(anyhow!("[project].deploy_dir must not be empty"));
    }
    let output_root = normalized(&cfg.project.output_root);
    if output_root == normalized(&cfg.project.deploy_dir) {
        return Err(anyhow!(
            "[project].output_root and deploy_dir must differ (got '{}')",
            cfg.project.output_root
        ));
    }

    let sources = [
        ("resources", &cfg.sources.resources),
        ("scripts", &cfg.sources.scripts),
        ("compose", &cfg.sources.compose),
    ];
    for (name, dir) in sources {
        if dir.trim().is_empty() {
            return Err(anyhow!("[sources].{name} must not be empty"));
        }
        if normalized(dir) == output_root {
            return Err(anyhow!(
                "[sources].{name} must not equal the output root '{}'",
                cfg.project.output_root
            ));
        }
    }

    Ok(())
}

/// Lexical normalization for path comparisons: slashes unified, `.`
/// components and trailing separators stripped. So `./target/www` collides
/// with `target/www` instead of slipping past the distinctness checks.
fn normalized(dir: &str) -> PathBuf {
    let unified = dir.replace('\\', "/");
    let mut out = PathBuf::new();
    for comp in Path::new(&unified).components() {
        match comp {
            Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn validate_styles(cfg: &ConfigFile) -> Result<()> {
    for (src, dest) in cfg.styles.iter() {
        if src.trim().is_empty() || dest.trim().is_empty() {
            return Err(anyhow!(
                "[styles] entries must map a non-empty source to a non-empty destination"
            ));
        }
    }
    Ok(())
}

fn validate_tools(cfg: &ConfigFile) -> Result<()> {
    for placeholder in ["{src}", "{dest}"] {
        if !cfg.tools.styles_cmd.contains(placeholder) {
            return Err(anyhow!(
                "[tools].styles_cmd must contain the {placeholder} placeholder"
            ));
        }
    }
    for placeholder in ["{entry}", "{out}"] {
        if !cfg.tools.bundle_cmd.contains(placeholder) {
            return Err(anyhow!(
                "[tools].bundle_cmd must contain the {placeholder} placeholder"
            ));
        }
    }
    if cfg.tools.lint_cmd.trim().is_empty() {
        return Err(anyhow!("[tools].lint_cmd must not be empty"));
    }
    Ok(())
}

fn validate_watch(cfg: &ConfigFile) -> Result<()> {
    cfg.watch
        .while_running
        .parse::<WhileRunningBehaviour>()
        .map_err(|e| anyhow!(e))
        .context("invalid [watch].while_running")?;

    if cfg.watch.queue_length == 0 {
        return Err(anyhow!("[watch].queue_length must be >= 1 (got 0)"));
    }

    for pat in cfg.watch.exclude.iter() {
        Glob::new(pat).with_context(|| format!("invalid [watch].exclude glob: {pat}"))?;
    }

    Ok(())
}

/// The step wiring is fixed in code, but verify it anyway so a wiring mistake
/// fails at config load rather than as a hung run.
fn validate_plans(_cfg: &ConfigFile) -> Result<()> {
    for goal in Goal::ALL {
        let plan = Plan::for_goal(goal);
        plan.graph()
            .check_acyclic()
            .with_context(|| format!("step graph for goal '{goal}'"))?;
    }
    Ok(())
}
