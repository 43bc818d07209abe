//! The external line-search collaborator.
//!
//! The analysis never scans file contents for usages itself. It hands a
//! pattern, a root and a set of globs to a [`SearchBackend`] and gets back
//! raw `path:line:col:content` lines. [`Ripgrep`] is the production backend.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::error::{BroomError, SearchError};
use crate::types::Location;

/// Glob selecting Python sources.
pub const PYTHON_GLOB: &str = "*.py";

/// Globs excluded when test files are skipped.
pub const TEST_FILE_GLOBS: &[&str] = &["test_*.py", "*_test.py"];

/// One search invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    /// Regex to search for.
    pub pattern: String,
    /// Directory the search is constrained to.
    pub root: PathBuf,
    /// Only files matching one of these globs are searched.
    pub include_globs: Vec<String>,
    /// Files matching any of these globs are skipped.
    pub exclude_globs: Vec<String>,
}

impl SearchRequest {
    /// Request for call sites of `name`: `\bname\s*\(` over Python files.
    pub fn for_symbol(name: &str, root: &Path, skip_tests: bool) -> Self {
        let exclude_globs = if skip_tests {
            TEST_FILE_GLOBS.iter().map(|g| g.to_string()).collect()
        } else {
            Vec::new()
        };
        Self {
            pattern: format!(r"\b{}\s*\(", regex::escape(name)),
            root: root.to_path_buf(),
            include_globs: vec![PYTHON_GLOB.to_string()],
            exclude_globs,
        }
    }
}

/// A line-oriented search engine.
///
/// Implementations return every match as `path:line:col:content`. A search
/// that finds nothing is `Ok(vec![])`, not an error.
pub trait SearchBackend: Send + Sync {
    fn search(&self, request: &SearchRequest) -> Result<Vec<String>, SearchError>;
}

/// A raw match split into its location and line content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawMatch {
    pub location: Location,
    pub content: String,
}

/// Parse a `path:line:col:content` line.
///
/// Returns `None` for lines with fewer than four fields or with
/// non-numeric line/column fields.
pub fn parse_raw_match(raw: &str) -> Option<RawMatch> {
    let mut parts = raw.splitn(4, ':');
    let file = parts.next()?;
    let line = parts.next()?.parse().ok()?;
    let column = parts.next()?.parse().ok()?;
    let content = parts.next()?;
    Some(RawMatch {
        location: Location::new(file, line, column),
        content: content.to_string(),
    })
}

/// Search backend that shells out to ripgrep (`rg --vimgrep`).
#[derive(Clone, Debug)]
pub struct Ripgrep {
    program: PathBuf,
}

impl Default for Ripgrep {
    fn default() -> Self {
        Self::new("rg")
    }
}

impl Ripgrep {
    /// Use a specific executable instead of `rg` from PATH.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Verify the executable can be spawned.
    ///
    /// This is a setup check; run it once before starting an analysis.
    pub fn ensure_available(&self) -> Result<(), BroomError> {
        match Command::new(&self.program).arg("--version").output() {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(BroomError::SearchToolMissing {
                tool: self.program.display().to_string(),
            }),
            Err(e) => Err(BroomError::Io(e)),
        }
    }

    fn build_args(request: &SearchRequest) -> Vec<String> {
        let mut args = vec!["--vimgrep".to_string()];
        for glob in &request.include_globs {
            args.push("--glob".to_string());
            args.push(glob.clone());
        }
        for glob in &request.exclude_globs {
            args.push("--glob".to_string());
            args.push(format!("!{}", glob));
        }
        // `-e` keeps patterns starting with `-` from being read as flags
        args.push("-e".to_string());
        args.push(request.pattern.clone());
        args.push(request.root.to_string_lossy().to_string());
        args
    }
}

impl SearchBackend for Ripgrep {
    fn search(&self, request: &SearchRequest) -> Result<Vec<String>, SearchError> {
        let args = Self::build_args(request);
        debug!("Running {} {}", self.program.display(), args.join(" "));

        let output = match Command::new(&self.program).args(&args).output() {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SearchError::ToolNotFound {
                    tool: self.program.display().to_string(),
                })
            }
            Err(e) => return Err(SearchError::Io(e)),
        };

        match output.status.code() {
            Some(0) => Ok(String::from_utf8_lossy(&output.stdout)
                .lines()
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect()),
            // ripgrep exits with 1 when nothing matched
            Some(1) => Ok(Vec::new()),
            code => Err(SearchError::Failed {
                code,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }
}
