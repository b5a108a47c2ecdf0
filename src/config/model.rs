// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [project]
/// output_root = "target/www"
/// deploy_dir = "../webapp/target/webapp"
///
/// [sources]
/// resources = "src/main/resources"
/// scripts = "src/main/js"
/// compose = "target/ui-compose"
///
/// [styles]
/// "css/structure.less" = "css/structure.css"
///
/// [watch]
/// while_running = "queue"
/// queue_length = 1
/// ```
///
/// All sections are optional; the defaults reproduce the conventional layout
/// of the UI module this tool builds.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// Output root and deploy directory from `[project]`.
    #[serde(default)]
    pub project: ProjectSection,

    /// Source tree locations from `[sources]`.
    #[serde(default)]
    pub sources: SourcesSection,

    /// Stylesheet entries from `[styles]`: source → destination, both
    /// relative to the output root.
    #[serde(default = "default_styles")]
    pub styles: BTreeMap<String, String>,

    /// Module bundling configuration from `[bundle]`.
    #[serde(default)]
    pub bundle: BundleSection,

    /// External tool command templates from `[tools]`.
    #[serde(default)]
    pub tools: ToolsSection,

    /// Watch-mode behaviour from `[watch]`.
    #[serde(default)]
    pub watch: WatchSection,

    /// Logical module name → physical source path, from `[modules]`.
    ///
    /// Consumed by the application at runtime, not by the orchestrator;
    /// the bundle step serializes it verbatim next to the bundle output.
    #[serde(default)]
    pub modules: BTreeMap<String, String>,
}

impl Default for ConfigFile {
    /// Same result as deserializing an empty TOML document.
    fn default() -> Self {
        Self {
            project: ProjectSection::default(),
            sources: SourcesSection::default(),
            styles: default_styles(),
            bundle: BundleSection::default(),
            tools: ToolsSection::default(),
            watch: WatchSection::default(),
            modules: BTreeMap::new(),
        }
    }
}

/// `[project]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
    /// Directory into which all build steps write, relative to the config
    /// file's directory.
    #[serde(default = "default_output_root")]
    pub output_root: String,

    /// External directory that receives a copy of the output root.
    #[serde(default = "default_deploy_dir")]
    pub deploy_dir: String,
}

fn default_output_root() -> String {
    "target/www".to_string()
}

fn default_deploy_dir() -> String {
    "../webapp/target/webapp".to_string()
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            output_root: default_output_root(),
            deploy_dir: default_deploy_dir(),
        }
    }
}

/// `[sources]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesSection {
    /// Static resources copied verbatim into the output root.
    #[serde(default = "default_resources")]
    pub resources: String,

    /// Script sources; only `**/*.js` files are copied.
    #[serde(default = "default_scripts")]
    pub scripts: String,

    /// Generated compose directory. Missing is treated as empty, since it is
    /// produced by an upstream build.
    #[serde(default = "default_compose")]
    pub compose: String,
}

fn default_resources() -> String {
    "src/main/resources".to_string()
}

fn default_scripts() -> String {
    "src/main/js".to_string()
}

fn default_compose() -> String {
    "target/ui-compose".to_string()
}

impl Default for SourcesSection {
    fn default() -> Self {
        Self {
            resources: default_resources(),
            scripts: default_scripts(),
            compose: default_compose(),
        }
    }
}

fn default_styles() -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    map.insert(
        "css/structure.less".to_string(),
        "css/structure.css".to_string(),
    );
    map.insert("css/theme.less".to_string(), "css/theme.css".to_string());
    map
}

/// `[bundle]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BundleSection {
    /// Entry module, relative to the scripts directory.
    #[serde(default = "default_bundle_entry")]
    pub entry: String,

    /// Bundle output path, relative to the output root.
    #[serde(default = "default_bundle_out")]
    pub out: String,

    /// Module names excluded from optimization (pass-through to the bundler).
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_bundle_entry() -> String {
    "main.js".to_string()
}

fn default_bundle_out() -> String {
    "main.js".to_string()
}

impl Default for BundleSection {
    fn default() -> Self {
        Self {
            entry: default_bundle_entry(),
            out: default_bundle_out(),
            exclude: Vec::new(),
        }
    }
}

/// `[tools]` section: command templates for the external transform steps.
///
/// Placeholders:
/// - `styles_cmd`: `{src}` and `{dest}` (per stylesheet entry)
/// - `bundle_cmd`: `{root}`, `{entry}`, `{out}` and `{exclude}`
/// - `lint_cmd`: none (runs in the project directory)
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsSection {
    #[serde(default = "default_styles_cmd")]
    pub styles_cmd: String,

    #[serde(default = "default_bundle_cmd")]
    pub bundle_cmd: String,

    #[serde(default = "default_lint_cmd")]
    pub lint_cmd: String,
}

fn default_styles_cmd() -> String {
    "npx lessc {src} {dest}".to_string()
}

fn default_bundle_cmd() -> String {
    "npx r.js -o baseUrl={root} name={entry} out={out} exclude={exclude}".to_string()
}

fn default_lint_cmd() -> String {
    "npx eslint .".to_string()
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            styles_cmd: default_styles_cmd(),
            bundle_cmd: default_bundle_cmd(),
            lint_cmd: default_lint_cmd(),
        }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Extra glob patterns to ignore while watching.
    ///
    /// The output root and deploy directory are always excluded, so a cycle's
    /// own writes never re-trigger it.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// `"queue"` or `"drop"`.
    ///
    /// - `"queue"` (default): remember change batches that arrive while a
    ///   cycle is running and replay one merged cycle afterwards.
    /// - `"drop"`: ignore changes that arrive while a cycle is running.
    #[serde(default = "default_while_running")]
    pub while_running: String,

    /// Maximum number of pending cycles to remember in queue mode.
    #[serde(default = "default_queue_length")]
    pub queue_length: usize,
}

fn default_while_running() -> String {
    "queue".to_string()
}

fn default_queue_length() -> usize {
    1
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            while_running: default_while_running(),
            queue_length: default_queue_length(),
        }
    }
}
