//! Definition discovery.
//!
//! Each file is scanned by an independent rayon task. A file that cannot be
//! read contributes no definitions and is logged; it never aborts the run.

use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use std::fs;
use tracing::{debug, warn};

use crate::types::{Definition, DefinitionFilter, SourceFile};

static DEF_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:async\s+)?def\s+([a-zA-Z_][a-zA-Z0-9_]*)\s*\(").unwrap());

/// Extract definitions from already-loaded source text.
pub fn definitions_in_source(source: &str, file: &str, filter: DefinitionFilter) -> Vec<Definition> {
    source
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let name = DEF_PATTERN.captures(line)?.get(1)?.as_str();
            if filter.skip_private && name.starts_with('_') {
                return None;
            }
            Some(Definition::new(name, file, idx + 1))
        })
        .collect()
}

/// Scan a single file. Read failures yield an empty list.
fn scan_file(file: &SourceFile, filter: DefinitionFilter) -> Vec<Definition> {
    let path = file.path.to_string_lossy();
    match fs::read(&file.path) {
        Ok(bytes) => definitions_in_source(&String::from_utf8_lossy(&bytes), &path, filter),
        Err(e) => {
            warn!("Error reading file {}: {}", path, e);
            Vec::new()
        }
    }
}

/// Find definitions in all files, one task per file.
///
/// Results are merged only once every file has been processed. Their order
/// is not meaningful; callers that need determinism must sort.
pub fn find_definitions(files: &[SourceFile], filter: DefinitionFilter) -> Vec<Definition> {
    let definitions: Vec<Definition> = files
        .par_iter()
        .map(|file| scan_file(file, filter))
        .flatten_iter()
        .collect();

    debug!(
        "Found {} definitions in {} files",
        definitions.len(),
        files.len()
    );
    definitions
}
