//! End-to-end analysis: walk, discover, search, filter, sort.

use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

use crate::definitions::find_definitions;
use crate::error::Result;
use crate::pipeline::{filter_by_usage_count, sort_records, SortOptions, UsageBounds};
use crate::scanner::scan_python_files;
use crate::search::SearchBackend;
use crate::types::{AnalysisResult, DefinitionFilter, UsageFilter};
use crate::usages::analyze_usages;

/// Everything a run needs, already validated by the caller.
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    /// Directory to analyze.
    pub root: PathBuf,
    /// Extra directory names to prune during the walk.
    pub ignored_dirs: Vec<String>,
    pub definition_filter: DefinitionFilter,
    pub usage_filter: UsageFilter,
    pub bounds: UsageBounds,
    pub sort: SortOptions,
    /// Cap on concurrent searches (`None` = one per CPU).
    pub workers: Option<usize>,
}

impl AnalysisConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignored_dirs: Vec::new(),
            definition_filter: DefinitionFilter::default(),
            usage_filter: UsageFilter::default(),
            bounds: UsageBounds::default(),
            sort: SortOptions::default(),
            workers: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Run the whole pipeline against `backend`.
///
/// Empty outcomes are not errors: check `total_files`,
/// `total_definitions` and `records` on the result to tell them apart.
///
/// # Errors
///
/// Only setup failures (missing root, walk error, worker pool) are
/// returned. Per-file and per-symbol failures are logged and skipped.
pub fn analyze<B: SearchBackend + ?Sized>(config: &AnalysisConfig, backend: &B) -> Result<AnalysisResult> {
    let start = Instant::now();

    let files = scan_python_files(&config.root, &config.ignored_dirs)?;
    info!("Found {} Python files", files.len());
    if files.is_empty() {
        return Ok(AnalysisResult::default());
    }

    let definitions = find_definitions(&files, config.definition_filter);
    info!("Found {} methods", definitions.len());
    let total_definitions = definitions.len();
    if definitions.is_empty() {
        return Ok(AnalysisResult {
            total_files: files.len(),
            ..AnalysisResult::default()
        });
    }

    let records = analyze_usages(
        definitions,
        &config.root,
        config.usage_filter,
        backend,
        config.workers,
    )?;

    let mut records = filter_by_usage_count(records, config.bounds);
    if !config.bounds.is_unbounded() {
        info!("Filtered to {} methods based on usage count", records.len());
    }

    sort_records(&mut records, config.sort);
    info!(
        "Analyzed {} methods in {:.1}ms",
        total_definitions,
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(AnalysisResult {
        total_files: files.len(),
        total_definitions,
        records,
    })
}
