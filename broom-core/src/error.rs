//! Error types for broom-core.
//!
//! Only setup problems surface as [`BroomError`]. Failures that concern a
//! single file or a single symbol are logged and degraded to an empty
//! contribution by the phase that hit them.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for broom-core operations.
pub type Result<T> = std::result::Result<T, BroomError>;

/// Fatal errors that abort an analysis before any work starts.
#[derive(Error, Debug)]
pub enum BroomError {
    /// The analysis root does not exist.
    #[error("Path does not exist: {}", path.display())]
    RootNotFound {
        /// Root that was requested.
        path: PathBuf,
    },

    /// The analysis root exists but is not a directory.
    #[error("Not a directory: {}", path.display())]
    NotADirectory {
        /// Root that was requested.
        path: PathBuf,
    },

    /// Walking the directory tree failed.
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// The external search tool is not installed.
    #[error("{tool} is not installed or not on PATH. Please install it first.")]
    SearchToolMissing {
        /// Executable name that was looked up.
        tool: String,
    },

    /// Could not build the worker pool for the usage search.
    #[error("Failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// IO error while inspecting the root.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from a single invocation of the search collaborator.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The search executable could not be found.
    #[error("search tool '{tool}' not found")]
    ToolNotFound {
        /// Executable name that was spawned.
        tool: String,
    },

    /// The search tool exited with a status other than success or "no matches".
    #[error("search tool exited with status {code:?}: {stderr}")]
    Failed {
        /// Exit code, if the process was not killed by a signal.
        code: Option<i32>,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// IO error while spawning or reading the search tool.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
