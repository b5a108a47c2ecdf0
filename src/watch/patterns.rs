// src/watch/patterns.rs

use std::fmt;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::config::model::ConfigFile;

/// Compiled include/exclude glob profile for watch mode.
///
/// Patterns are evaluated against paths relative to the project root, with
/// forward slashes. A change is interesting when it matches an include
/// pattern and no exclude pattern.
#[derive(Clone)]
pub struct WatchProfile {
    include_set: GlobSet,
    exclude_set: Option<GlobSet>,
}

impl fmt::Debug for WatchProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchProfile").finish_non_exhaustive()
    }
}

impl WatchProfile {
    /// Returns true when a cycle should run for the given path (relative to
    /// the project root), e.g. `"src/main/js/app.js"`.
    pub fn matches(&self, rel_path: &str) -> bool {
        if !self.include_set.is_match(rel_path) {
            return false;
        }
        if let Some(exclude) = &self.exclude_set {
            if exclude.is_match(rel_path) {
                return false;
            }
        }
        true
    }
}

/// Build the watch profile from configuration.
///
/// Watched trees mirror what the build reads: the resources dir, script
/// sources (`**/*.js`) and the compose dir. The output root and deploy dir
/// are always excluded so a cycle's own writes never re-trigger it;
/// `[watch].exclude` patterns are appended.
pub fn build_watch_profile(cfg: &ConfigFile) -> Result<WatchProfile> {
    let includes = [
        format!("{}/**", trim_pattern_dir(&cfg.sources.resources)),
        format!("{}/**/*.js", trim_pattern_dir(&cfg.sources.scripts)),
        format!("{}/**", trim_pattern_dir(&cfg.sources.compose)),
    ];

    let mut excludes = vec![
        format!("{}/**", trim_pattern_dir(&cfg.project.output_root)),
        format!("{}/**", trim_pattern_dir(&cfg.project.deploy_dir)),
    ];
    excludes.extend(cfg.watch.exclude.iter().cloned());

    let include_set = build_globset(&includes).context("building watch include globset")?;
    let exclude_set = Some(build_globset(&excludes).context("building watch exclude globset")?);

    Ok(WatchProfile {
        include_set,
        exclude_set,
    })
}

/// Normalize a configured directory for use inside a glob pattern.
fn trim_pattern_dir(dir: &str) -> String {
    dir.replace('\\', "/").trim_end_matches('/').to_string()
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
