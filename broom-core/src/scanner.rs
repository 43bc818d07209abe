//! Python file discovery using the `ignore` crate.
//!
//! The walk does not consult `.gitignore` or hidden-file rules; it prunes a
//! fixed set of directory names (version control, virtual environments,
//! caches) plus any extra names supplied by the caller. Pruned directories
//! are never descended into.

use ignore::WalkBuilder;
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

use crate::error::{BroomError, Result};
use crate::types::SourceFile;

/// Directory names that are always pruned.
pub const DEFAULT_IGNORED_DIRS: &[&str] = &[".git", "__pycache__", ".venv", "venv", "node_modules"];

/// Python sources are recognised by suffix only.
pub fn is_python_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "py")
}

/// Collect every `.py` file under `root`.
///
/// # Arguments
///
/// * `root` - Directory to walk
/// * `extra_ignored` - Directory names to prune in addition to [`DEFAULT_IGNORED_DIRS`]
///
/// # Errors
///
/// Fails fast if the root is missing or any part of the walk errors; a
/// broken subtree is a setup problem, not something to skip silently.
pub fn scan_python_files(root: &Path, extra_ignored: &[String]) -> Result<Vec<SourceFile>> {
    let start = Instant::now();

    if !root.exists() {
        return Err(BroomError::RootNotFound {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(BroomError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let ignored: HashSet<String> = DEFAULT_IGNORED_DIRS
        .iter()
        .map(|d| d.to_string())
        .chain(extra_ignored.iter().map(|d| d.trim_end_matches('/').to_string()))
        .collect();

    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false) // No gitignore/hidden handling, only our prune list
        .follow_links(false)
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            // Depth 0 is the root itself, which is never pruned
            !(is_dir
                && entry.depth() > 0
                && ignored.contains(entry.file_name().to_string_lossy().as_ref()))
        });

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry?;
        let is_file = entry.file_type().is_some_and(|ft| ft.is_file());
        if is_file && is_python_file(entry.path()) {
            files.push(SourceFile::new(entry.into_path()));
        }
    }

    debug!(
        "Found {} Python files under {} in {:.1}ms",
        files.len(),
        root.display(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(files)
}
