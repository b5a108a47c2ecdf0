// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Compiling the source-tree include/exclude glob profile from config.
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//!
//! It does **not** know about steps or plans; it only turns filesystem
//! changes into cycle requests for the runtime.

pub mod patterns;
pub mod watcher;

pub use patterns::{WatchProfile, build_watch_profile};
pub use watcher::{WatcherHandle, spawn_watcher};
