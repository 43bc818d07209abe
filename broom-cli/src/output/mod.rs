//! Report rendering for the pybr CLI.
//!
//! An [`AnalysisResult`] can be rendered as a colored console report,
//! pretty JSON, a table, vimgrep lines for editor quickfix lists, or a
//! Graphviz call graph.
//!
//! Colors and truncation follow the destination: both are disabled when
//! stdout is not a TTY or when the report goes to a file.

use anyhow::{Context, Result};
use broom_core::AnalysisResult;
use clap::ValueEnum;
use std::fs::File;
use std::io::{BufWriter, IsTerminal, Write};
use std::path::Path;
use std::str::FromStr;

mod console;
mod graphviz;
mod json;
mod table;
mod vimgrep;

pub use self::console::ConsoleOutput;
pub use self::graphviz::GraphvizOutput;
pub use self::json::JsonOutput;
pub use self::table::TableOutput;
pub use self::vimgrep::VimgrepOutput;

/// Output format for analysis reports
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable report with a summary (default)
    #[default]
    Console,
    /// JSON format for machine consumption
    Json,
    /// One row per definition
    Table,
    /// `path:line:col:context` per usage, for editor quickfix lists
    Vimgrep,
    /// Graphviz digraph of using files to definitions
    Graphviz,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" => Ok(OutputFormat::Console),
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            "vimgrep" => Ok(OutputFormat::Vimgrep),
            "graphviz" => Ok(OutputFormat::Graphviz),
            _ => Err(format!("Unknown output format: '{}'", s)),
        }
    }
}

/// Configuration for output rendering
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Disable colored output
    pub no_color: bool,
    /// Disable truncation of long values
    pub no_truncate: bool,
    /// Override terminal width (None = auto-detect)
    pub width: Option<usize>,
}

impl OutputConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            no_color: false,
            no_truncate: false,
            width: None,
        }
    }

    /// Create an OutputConfig with automatic TTY detection and optional color override.
    ///
    /// # Arguments
    ///
    /// * `format` - The output format to use
    /// * `color_override` - If `Some(true)`, force colors on. If `Some(false)`, force colors off.
    ///   If `None`, use auto-detection based on TTY.
    pub fn auto_detect_with_color_override(
        format: OutputFormat,
        color_override: Option<bool>,
    ) -> Self {
        let is_tty = std::io::stdout().is_terminal();
        let use_color = color_override.unwrap_or(is_tty);
        Self {
            format,
            no_color: !use_color,
            no_truncate: !is_tty,
            width: None,
        }
    }

    /// Config for a report written to a file: plain text, nothing cut.
    pub fn for_file(format: OutputFormat) -> Self {
        Self::new(format).without_colors().without_truncation()
    }

    /// Get the effective terminal width
    pub fn effective_width(&self) -> usize {
        self.width.unwrap_or_else(|| {
            terminal_size::terminal_size()
                .map(|(w, _)| w.0 as usize)
                .unwrap_or(80)
        })
    }

    pub fn use_colors(&self) -> bool {
        !self.no_color
    }

    pub fn should_truncate(&self) -> bool {
        !self.no_truncate
    }

    /// Builder: disable colors
    pub fn without_colors(mut self) -> Self {
        self.no_color = true;
        self
    }

    /// Builder: disable truncation
    pub fn without_truncation(mut self) -> Self {
        self.no_truncate = true;
        self
    }

    /// Builder: set width
    #[cfg(test)]
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }
}

/// Render `result` in the configured format.
pub fn render(result: &AnalysisResult, config: &OutputConfig) -> String {
    match config.format {
        OutputFormat::Console => ConsoleOutput::format(&result.records, config),
        OutputFormat::Json => JsonOutput::format(result),
        OutputFormat::Table => TableOutput::format(&result.records, config),
        OutputFormat::Vimgrep => VimgrepOutput::format(&result.records),
        OutputFormat::Graphviz => GraphvizOutput::format(&result.records),
    }
}

/// Write a rendered report to `path`, or to stdout when `path` is `None`.
pub fn write_report(report: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            writer
                .write_all(report.as_bytes())
                .and_then(|_| writer.flush())
                .with_context(|| format!("Failed to write results to {}", path.display()))?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(report.as_bytes())
                .and_then(|_| lock.flush())
                .context("Failed to write results to stdout")?;
        }
    }
    Ok(())
}

/// Truncate a string to a maximum width with ellipsis
pub fn truncate(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        s.chars().take(max_width).collect()
    } else {
        let truncated: String = s.chars().take(max_width - 3).collect();
        format!("{}...", truncated)
    }
}
