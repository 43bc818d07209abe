//! py-broom core - find Python definitions and classify how they are used.
//!
//! The engine runs in two parallel phases separated by a barrier:
//!
//! 1. **Definition discovery**: the tree walker lists `.py` files and the
//!    definition scanner extracts every `def name(` site, one task per file.
//! 2. **Usage search**: for every definition, an external line-oriented
//!    search tool (ripgrep by default) is asked for raw matches, and each
//!    match is run through the call classifier.
//!
//! The resulting [`UsageRecord`]s are filtered by usage-count bounds and
//! ordered by the result pipeline before being handed to a presentation
//! layer.
//!
//! # Example
//!
//! ```no_run
//! use broom_core::{analyze, AnalysisConfig, Ripgrep};
//!
//! let config = AnalysisConfig::new("src");
//! let result = analyze(&config, &Ripgrep::default())?;
//! for record in &result.records {
//!     println!("{} -> {}", record.definition.name, record.total_usages);
//! }
//! # Ok::<(), broom_core::BroomError>(())
//! ```

pub mod analyzer;
pub mod classifier;
pub mod definitions;
pub mod error;
pub mod pipeline;
pub mod scanner;
pub mod search;
pub mod types;
pub mod usages;

pub use analyzer::{analyze, AnalysisConfig};
pub use classifier::{classify, CallMatcher};
pub use error::{BroomError, Result, SearchError};
pub use pipeline::{filter_by_usage_count, sort_records, SortKey, SortOptions, UsageBounds};
pub use search::{Ripgrep, SearchBackend, SearchRequest};
pub use types::*;

/// Get the version of broom-core.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
