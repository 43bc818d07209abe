//! pybr - find unused and rarely used Python methods.
//!
//! Scans a directory for Python definitions, searches the tree for every
//! reference with ripgrep and classifies each call site.

use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use broom_core::{AnalysisConfig, DefinitionFilter, SortKey, SortOptions, UsageBounds, UsageFilter};
use config::BroomConfig;
use output::{OutputConfig, OutputFormat};

/// Analyze Python method usages across a repository.
///
/// Every `def` under the directory is looked up with ripgrep and each
/// reference is classified as a definition, instance, class, static,
/// function or decorator usage.
#[derive(Parser)]
#[command(name = "pybr")]
#[command(author, version)]
#[command(about = "Analyze Python method usages across a repository")]
#[command(next_help_heading = "Options")]
#[command(after_help = "Examples:
  pybr -d src                          Report every method under src/
  pybr --skip-definitions --max-usages 0
                                       List methods that are never used
  pybr --format vimgrep > hits.txt     Quickfix list for vim -q
  pybr --format graphviz | dot -Tsvg   Render a usage graph")]
pub struct Cli {
    /// Directory to search for Python files
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (overrides config default)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Skip import statements in usage results
    #[arg(long)]
    skip_imports: bool,

    /// Skip private methods (starting with _)
    #[arg(long)]
    skip_private: bool,

    /// Exclude test_*.py and *_test.py files from the usage search
    #[arg(
        long,
        default_value_t = true,
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    skip_tests: bool,

    /// Do not count a method's own definition line as a usage
    #[arg(long)]
    skip_definitions: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Keep methods with at least N usages (-1 = no filter)
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    min_usages: i64,

    /// Keep methods with at most N usages (-1 = no filter)
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    max_usages: i64,

    /// Sort results by: name, file, usages
    #[arg(long, default_value = "file")]
    sort: String,

    /// Sort in descending order
    #[arg(long)]
    desc: bool,

    /// Maximum concurrent searches (defaults to one per CPU)
    #[arg(short = 'j', long)]
    workers: Option<usize>,

    /// Enable verbose output (debug logging)
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show detailed version information
    #[arg(long = "version-verbose")]
    version_verbose: bool,
}

impl Cli {
    /// Merge flags with the project config. Flags win.
    fn analysis_config(&self, config: &BroomConfig) -> AnalysisConfig {
        let sort_key = self.sort.parse::<SortKey>().unwrap_or_else(|e| {
            warn!("{}; sorting by file", e);
            SortKey::default()
        });

        let mut analysis = AnalysisConfig::new(&self.dir);
        analysis.ignored_dirs = config.ignored_dirs().to_vec();
        analysis.definition_filter = DefinitionFilter {
            skip_private: self.skip_private,
        };
        analysis.usage_filter = UsageFilter {
            skip_imports: self.skip_imports,
            skip_tests: self.skip_tests,
            skip_definitions: self.skip_definitions,
        };
        analysis.bounds = UsageBounds::from_signed(self.min_usages, self.max_usages);
        analysis.sort = SortOptions {
            key: sort_key,
            ascending: !self.desc,
        };
        analysis.workers = self.workers.or(config.workers());
        analysis
    }

    /// Resolve the output format and color policy: CLI flag > config > default.
    fn output_config(&self, config: &BroomConfig) -> OutputConfig {
        let format = self.format.unwrap_or_else(|| {
            config
                .default_format()
                .and_then(|f| f.parse().ok())
                .unwrap_or_default()
        });

        if self.output.is_some() {
            return OutputConfig::for_file(format);
        }
        let color_override = if self.no_color {
            Some(false)
        } else {
            config.use_color()
        };
        OutputConfig::auto_detect_with_color_override(format, color_override)
    }
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

/// Print verbose version information
fn print_verbose_version() {
    use colored::Colorize;

    let cli_version = env!("CARGO_PKG_VERSION");
    let platform = format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS);

    println!("pybr {}", cli_version);
    println!("  {:<12} {}", "broom-cli:".cyan(), cli_version);
    println!("  {:<12} {}", "broom-core:".cyan(), broom_core::version());
    println!("  {:<12} {}", "Platform:".cyan(), platform);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version_verbose {
        print_verbose_version();
        return Ok(());
    }

    setup_logging(cli.verbose, cli.quiet);

    // Load configuration from .broomrc.toml in the analysed root
    let config = BroomConfig::load(&cli.dir);

    let analysis = cli.analysis_config(&config);
    let output = cli.output_config(&config);

    commands::analyze::run(analysis, output, cli.output).await
}
