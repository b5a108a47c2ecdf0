// src/exec/context.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::model::ConfigFile;

/// Resolved, ready-to-use view of the configuration for step execution.
///
/// All paths are joined against the project root (the directory containing
/// the config file), so the executor never re-derives them. Shared read-only
/// across step tasks via `Arc`.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Directory containing the config file; external tools run from here.
    pub project_root: PathBuf,

    /// Directory all build steps write into.
    pub output_root: PathBuf,
    /// External directory that receives a copy of the output root.
    pub deploy_dir: PathBuf,

    pub resources_dir: PathBuf,
    pub scripts_dir: PathBuf,
    pub compose_dir: PathBuf,

    /// Stylesheet entries resolved under the output root: (source, dest).
    pub style_entries: Vec<(PathBuf, PathBuf)>,

    /// Bundle entry script (under the scripts dir) and output (under the
    /// output root).
    pub bundle_entry: PathBuf,
    pub bundle_out: PathBuf,
    /// Module names excluded from optimization, pass-through to the bundler.
    pub bundle_exclude: Vec<String>,

    pub styles_cmd: String,
    pub bundle_cmd: String,
    pub lint_cmd: String,

    /// Opaque module-alias table, serialized verbatim by the bundle step.
    pub modules: BTreeMap<String, String>,
}

impl BuildContext {
    pub fn new(cfg: &ConfigFile, project_root: impl AsRef<Path>) -> Self {
        let project_root = project_root.as_ref().to_path_buf();
        let output_root = project_root.join(&cfg.project.output_root);

        let style_entries = cfg
            .styles
            .iter()
            .map(|(src, dest)| (output_root.join(src), output_root.join(dest)))
            .collect();

        Self {
            output_root: output_root.clone(),
            deploy_dir: project_root.join(&cfg.project.deploy_dir),
            resources_dir: project_root.join(&cfg.sources.resources),
            scripts_dir: project_root.join(&cfg.sources.scripts),
            compose_dir: project_root.join(&cfg.sources.compose),
            style_entries,
            bundle_entry: project_root.join(&cfg.sources.scripts).join(&cfg.bundle.entry),
            bundle_out: output_root.join(&cfg.bundle.out),
            bundle_exclude: cfg.bundle.exclude.clone(),
            styles_cmd: cfg.tools.styles_cmd.clone(),
            bundle_cmd: cfg.tools.bundle_cmd.clone(),
            lint_cmd: cfg.tools.lint_cmd.clone(),
            modules: cfg.modules.clone(),
            project_root,
        }
    }

    /// Path the bundle step writes the module-alias table to, next to the
    /// bundle output.
    pub fn module_map_path(&self) -> PathBuf {
        self.bundle_out
            .parent()
            .unwrap_or(Path::new("."))
            .join("module-paths.json")
    }
}
