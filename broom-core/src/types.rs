//! Data model shared by every phase of the analysis.
//!
//! These types describe what was found (definitions), how it is referenced
//! (usages and their call type) and the per-definition aggregate handed to
//! the presentation layer.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A Python file discovered by the tree walker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    /// Parent directory.
    pub dir: PathBuf,
    /// File name without the directory.
    pub base: String,
    /// Full path as produced by the walk (rooted at the analysis root).
    pub path: PathBuf,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let base = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self { dir, base, path }
    }
}

/// A located `def name(` line.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Definition {
    pub name: String,
    #[serde(rename = "filename")]
    pub file: String,
    #[serde(rename = "line_number")]
    pub line: usize,
}

impl Definition {
    pub fn new(name: impl Into<String>, file: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            line,
        }
    }

    /// Names with a leading underscore are private by Python convention.
    pub fn is_private(&self) -> bool {
        self.name.starts_with('_')
    }

    /// `file:line` of the definition site.
    pub fn location(&self) -> String {
        format!("{}:{}", self.file, self.line)
    }
}

/// Lexical category of a reference to a symbol.
///
/// Declaration order is the display order, so the derived `Ord` can be
/// used for grouping. Classification tries decorators right after
/// definitions; see [`crate::classifier`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallType {
    /// `def method(`
    Definition,
    /// `self.method(`
    Instance,
    /// `cls.method(`
    Class,
    /// `ClassName.method(`
    Static,
    /// `method(` without a qualifier
    Function,
    /// `@method` or `@pkg.method`
    Decorator,
}

impl CallType {
    /// Every call type in display order.
    pub const ALL: [CallType; 6] = [
        CallType::Definition,
        CallType::Instance,
        CallType::Class,
        CallType::Static,
        CallType::Function,
        CallType::Decorator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CallType::Definition => "definition",
            CallType::Instance => "instance",
            CallType::Class => "class",
            CallType::Static => "static",
            CallType::Function => "function",
            CallType::Decorator => "decorator",
        }
    }

    /// Human label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            CallType::Definition => "Definition",
            CallType::Instance => "Instance calls",
            CallType::Class => "Class calls",
            CallType::Static => "Static calls",
            CallType::Function => "Function calls",
            CallType::Decorator => "Decorator usage",
        }
    }
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CallType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CallType::ALL
            .into_iter()
            .find(|ct| ct.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown call type: '{}'", s))
    }
}

/// Position of a match, rendered as `path:line:col`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

impl FromStr for Location {
    type Err = String;

    /// Parses from the right so paths containing `:` survive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.rsplitn(3, ':');
        let column = parts.next();
        let line = parts.next();
        let file = parts.next();
        match (file, line, column) {
            (Some(file), Some(line), Some(column)) if !file.is_empty() => {
                let line = line
                    .parse()
                    .map_err(|_| format!("invalid line number in location '{}'", s))?;
                let column = column
                    .parse()
                    .map_err(|_| format!("invalid column in location '{}'", s))?;
                Ok(Location::new(file, line, column))
            }
            _ => Err(format!("expected path:line:col, got '{}'", s)),
        }
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A single classified reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub location: Location,
    pub call_type: CallType,
    /// The matched source line, trimmed.
    pub context: String,
}

/// All usages found for one definition.
///
/// Build it with [`UsageRecord::new`] so the counts always agree with the
/// usage list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    #[serde(rename = "method")]
    pub definition: Definition,
    pub usages: Vec<Usage>,
    #[serde(rename = "usages_by_type")]
    pub counts_by_type: BTreeMap<CallType, usize>,
    pub total_usages: usize,
}

impl UsageRecord {
    pub fn new(definition: Definition, usages: Vec<Usage>) -> Self {
        let mut counts_by_type = BTreeMap::new();
        for usage in &usages {
            *counts_by_type.entry(usage.call_type).or_insert(0) += 1;
        }
        Self {
            definition,
            total_usages: usages.len(),
            usages,
            counts_by_type,
        }
    }

    /// Record for a definition whose search failed or found nothing.
    pub fn empty(definition: Definition) -> Self {
        Self::new(definition, Vec::new())
    }

    pub fn count(&self, call_type: CallType) -> usize {
        self.counts_by_type.get(&call_type).copied().unwrap_or(0)
    }

    /// Usages grouped by call type, in display order, skipping empty groups.
    pub fn grouped(&self) -> Vec<(CallType, Vec<&Usage>)> {
        CallType::ALL
            .into_iter()
            .filter_map(|ct| {
                let group: Vec<&Usage> =
                    self.usages.iter().filter(|u| u.call_type == ct).collect();
                (!group.is_empty()).then_some((ct, group))
            })
            .collect()
    }
}

/// Terminal artifact of a run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Number of `.py` files that were scanned.
    pub total_files: usize,
    /// Number of definitions discovered, before count filtering.
    #[serde(rename = "total_methods")]
    pub total_definitions: usize,
    /// Surviving records in final order.
    #[serde(rename = "results")]
    pub records: Vec<UsageRecord>,
}

/// Applied while scanning for definitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefinitionFilter {
    /// Drop names starting with `_`.
    pub skip_private: bool,
}

/// Applied while searching and classifying usages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UsageFilter {
    /// Drop `import ...` / `from ...` lines.
    pub skip_imports: bool,
    /// Exclude `test_*.py` and `*_test.py` from the search.
    pub skip_tests: bool,
    /// Drop definition matches located in the defining file itself.
    pub skip_definitions: bool,
}

impl Default for UsageFilter {
    fn default() -> Self {
        Self {
            skip_imports: false,
            skip_tests: true,
            skip_definitions: false,
        }
    }
}
