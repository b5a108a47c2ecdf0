// src/exec/copy.rs

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use blake3::Hasher;
use globset::GlobSet;
use ignore::WalkBuilder;
use tracing::{debug, trace};

use crate::errors::{Result, UibuildError};

/// Copy every file under `src_root` into `dest_root`, preserving relative
/// paths.
///
/// - `include`: when set, only files whose root-relative path (with forward
///   slashes) matches the set are copied.
/// - Files whose destination already has identical content are left alone,
///   so re-running a build over unchanged sources is byte-for-byte idempotent
///   and never touches mtimes the watcher might see.
///
/// Returns the number of files written.
pub fn copy_tree(src_root: &Path, dest_root: &Path, include: Option<&GlobSet>) -> Result<u64> {
    if !src_root.is_dir() {
        return Err(UibuildError::MissingSource(src_root.to_path_buf()));
    }

    let mut copied = 0u64;

    // Raw walk: no gitignore semantics, hidden files included. The build
    // tree is authoritative; nothing under it is "ignored".
    let walker = WalkBuilder::new(src_root)
        .standard_filters(false)
        .build();

    for entry in walker {
        let entry = entry.map_err(|e| UibuildError::Other(e.into()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let rel = path
            .strip_prefix(src_root)
            .map_err(|e| UibuildError::Other(e.into()))?;

        if let Some(set) = include {
            let rel_str = rel.to_string_lossy().replace('\\', "/");
            if !set.is_match(&rel_str) {
                trace!(path = %rel_str, "skipping non-matching file");
                continue;
            }
        }

        let dest = dest_root.join(rel);
        if copy_if_changed(path, &dest)? {
            copied += 1;
        }
    }

    debug!(
        src = ?src_root,
        dest = ?dest_root,
        copied,
        "tree copy complete"
    );

    Ok(copied)
}

/// Copy `src` to `dest` unless the destination already has identical content.
///
/// Returns whether a write happened.
pub fn copy_if_changed(src: &Path, dest: &Path) -> Result<bool> {
    if dest.is_file() && hash_file(src)? == hash_file(dest)? {
        trace!(?dest, "destination up to date; skipping copy");
        return Ok(false);
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {:?}", parent))?;
    }
    fs::copy(src, dest).with_context(|| format!("copying {:?} to {:?}", src, dest))?;

    trace!(?src, ?dest, "copied file");
    Ok(true)
}

/// Content hash of a single file.
fn hash_file(path: &Path) -> Result<blake3::Hash> {
    let mut file =
        File::open(path).with_context(|| format!("opening file for hashing: {:?}", path))?;
    let mut hasher = Hasher::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf).map_err(UibuildError::Io)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize())
}
