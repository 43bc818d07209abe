//! The analysis command: find every Python definition under a directory
//! and report how often, and how, each one is used.

use anyhow::{Context, Result};
use broom_core::{analyze, AnalysisConfig, AnalysisResult, Ripgrep};
use std::path::PathBuf;
use tracing::debug;

use crate::output::{render, write_report, OutputConfig};

pub const NO_FILES: &str = "No Python files found in the specified directory";
pub const NO_DEFINITIONS: &str = "No method definitions found";
pub const NO_MATCHES: &str = "No methods found matching the filter criteria";

/// Message for a run that has nothing to report, if any.
pub fn empty_message(result: &AnalysisResult) -> Option<&'static str> {
    if result.total_files == 0 {
        Some(NO_FILES)
    } else if result.total_definitions == 0 {
        Some(NO_DEFINITIONS)
    } else if result.records.is_empty() {
        Some(NO_MATCHES)
    } else {
        None
    }
}

/// Run the analysis and print or save the report.
///
/// Empty outcomes print a message and succeed. Only setup problems (no
/// ripgrep, bad root, unwritable output file) are errors.
pub async fn run(
    analysis: AnalysisConfig,
    output: OutputConfig,
    output_path: Option<PathBuf>,
) -> Result<()> {
    let backend = Ripgrep::default();
    backend.ensure_available()?;

    debug!("Searching for Python files in: {}", analysis.root().display());

    let result = tokio::task::spawn_blocking(move || analyze(&analysis, &backend))
        .await
        .context("Analysis task failed")?
        .context("Analysis failed")?;

    if let Some(message) = empty_message(&result) {
        println!("{}", message);
        return Ok(());
    }

    colored::control::set_override(output.use_colors());
    let report = render(&result, &output);
    write_report(&report, output_path.as_deref())?;

    if let Some(path) = &output_path {
        debug!("Results written to {}", path.display());
    }
    Ok(())
}
