// src/errors.rs

//! Crate-wide error types.
//!
//! Step execution and config loading use these where a caller needs to
//! distinguish failure classes; everything else propagates `anyhow` context.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UibuildError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("missing source directory: {0}")]
    MissingSource(PathBuf),

    #[error("build output root does not exist: {0} (run `uibuild build` first)")]
    MissingOutputRoot(PathBuf),

    #[error("tool command for step '{step}' exited with code {code}")]
    ToolFailed { step: String, code: i32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, UibuildError>;
