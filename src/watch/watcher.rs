// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use anyhow::Result;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::{CycleReason, RuntimeEvent};
use crate::watch::patterns::WatchProfile;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive
/// for as long as needed. Dropping this handle stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher that observes the project root recursively and
/// sends `RuntimeEvent::CycleRequested` whenever a changed path matches the
/// watch profile.
///
/// The runtime and its queue decide what one request means while a cycle is
/// already running; the watcher itself never coalesces beyond what `notify`
/// delivers.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    profile: WatchProfile,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    let root = root.canonicalize().unwrap_or_else(|_| root.clone()); // best-effort

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel::<Event>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // Can't log via tracing here easily; fall back to stderr.
                    eprintln!("uibuild: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("uibuild: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!("file watcher started on {:?}", root);

    // Async task that consumes notify events and forwards cycle requests to
    // the runtime.
    let async_root = root.clone();
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!("received notify event: {:?}", event);

            for path in &event.paths {
                let Some(rel_str) = relative_str(&async_root, path) else {
                    debug!(
                        "path {:?} outside watch root {:?}; ignoring",
                        path, async_root
                    );
                    continue;
                };

                if profile.matches(&rel_str) {
                    debug!(path = %rel_str, "watch match -> requesting cycle");
                    if let Err(err) = runtime_tx
                        .send(RuntimeEvent::CycleRequested {
                            reason: CycleReason::FileChange,
                        })
                        .await
                    {
                        warn!("failed to send RuntimeEvent::CycleRequested: {err}");
                        // If the runtime channel is closed, there's no point
                        // keeping the watcher loop alive.
                        return;
                    }
                    // One request per event batch is enough.
                    break;
                }
            }
        }

        debug!("file watcher loop ended");
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Returns `None` if the path is not under `root`.
fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(rel.to_string_lossy().replace('\\', "/"))
}
