// src/config/mod.rs

//! Configuration loading, data model and validation.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_or_default};
pub use model::{
    BundleSection, ConfigFile, ProjectSection, SourcesSection, ToolsSection, WatchSection,
};
pub use validate::validate_config;
