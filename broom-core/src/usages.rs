//! Usage search orchestration.
//!
//! One task per definition asks the search backend for raw matches, then
//! classifies and filters each line into [`Usage`]s. Tasks run on a
//! dedicated rayon pool so the number of concurrent search processes is
//! capped at the pool size.

use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, warn};

use crate::classifier::CallMatcher;
use crate::error::Result;
use crate::search::{parse_raw_match, SearchBackend, SearchRequest};
use crate::types::{CallType, Definition, Usage, UsageFilter, UsageRecord};

/// `import x` / `from x import y` statements.
pub fn is_import_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with("import ") || trimmed.starts_with("from ")
}

/// Turn raw `path:line:col:content` lines into classified usages.
///
/// Malformed lines and lines that do not classify are dropped.
/// `defined_in` is the file of the definition being analysed; with
/// `skip_definitions` set, definition matches in that file are dropped while
/// re-definitions elsewhere are kept.
pub fn parse_usages(
    raw_lines: &[String],
    matcher: &CallMatcher,
    filter: UsageFilter,
    defined_in: &str,
) -> Vec<Usage> {
    raw_lines
        .iter()
        .filter_map(|raw| {
            let raw_match = parse_raw_match(raw)?;

            if filter.skip_imports && is_import_line(&raw_match.content) {
                return None;
            }

            let call_type = matcher.classify(&raw_match.content)?;

            if filter.skip_definitions
                && call_type == CallType::Definition
                && raw_match.location.file == defined_in
            {
                return None;
            }

            Some(Usage {
                location: raw_match.location,
                call_type,
                context: raw_match.content.trim().to_string(),
            })
        })
        .collect()
}

/// Search and classify usages for a single definition.
///
/// A failing search is logged and produces an empty record.
pub fn analyze_definition<B: SearchBackend + ?Sized>(
    definition: Definition,
    root: &Path,
    filter: UsageFilter,
    backend: &B,
) -> UsageRecord {
    let request = SearchRequest::for_symbol(&definition.name, root, filter.skip_tests);

    let raw_lines = match backend.search(&request) {
        Ok(lines) => lines,
        Err(e) => {
            warn!("Error searching for method {}: {}", definition.name, e);
            return UsageRecord::empty(definition);
        }
    };

    let matcher = CallMatcher::new(&definition.name);
    let usages = parse_usages(&raw_lines, &matcher, filter, &definition.file);
    UsageRecord::new(definition, usages)
}

/// Analyze every definition in parallel.
///
/// # Arguments
///
/// * `definitions` - Definitions to look up; each is analysed independently
/// * `root` - Directory the search is constrained to
/// * `filter` - Usage filters
/// * `backend` - Search collaborator
/// * `workers` - Maximum concurrent searches (`None` = rayon default)
///
/// # Returns
///
/// One record per input definition, in no particular order.
pub fn analyze_usages<B: SearchBackend + ?Sized>(
    definitions: Vec<Definition>,
    root: &Path,
    filter: UsageFilter,
    backend: &B,
    workers: Option<usize>,
) -> Result<Vec<UsageRecord>> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = workers.filter(|n| *n > 0) {
        builder = builder.num_threads(n);
    }
    let pool = builder.build()?;

    let count = definitions.len();
    debug!(
        "Searching usages for {} definitions on {} workers",
        count,
        pool.current_num_threads()
    );

    let records: Vec<UsageRecord> = pool.install(|| {
        definitions
            .into_par_iter()
            .map(|definition| analyze_definition(definition, root, filter, backend))
            .collect()
    });

    debug!("Collected {} usage records", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::types::Location;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend answering from a fixed table keyed by search pattern.
    struct CannedBackend {
        answers: HashMap<String, Vec<String>>,
        calls: AtomicUsize,
    }

    impl CannedBackend {
        fn new(answers: Vec<(&str, Vec<&str>)>) -> Self {
            Self {
                answers: answers
                    .into_iter()
                    .map(|(name, lines)| {
                        (
                            SearchRequest::for_symbol(name, Path::new("."), false).pattern,
                            lines.iter().map(|l| l.to_string()).collect(),
                        )
                    })
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl SearchBackend for CannedBackend {
        fn search(&self, request: &SearchRequest) -> std::result::Result<Vec<String>, SearchError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            match self.answers.get(&request.pattern) {
                Some(lines) => Ok(lines.clone()),
                None => Err(SearchError::Failed {
                    code: Some(2),
                    stderr: "boom".to_string(),
                }),
            }
        }
    }

    fn raw(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_is_import_line() {
        assert!(is_import_line("import os"));
        assert!(is_import_line("   from pkg import helper"));
        assert!(!is_import_line("imported = helper()"));
        assert!(!is_import_line("x = 1"));
    }

    #[test]
    fn test_parse_usages_classifies_and_trims() {
        let matcher = CallMatcher::new("helper");
        let lines = raw(&[
            "a.py:1:5:def helper():",
            "a.py:5:9:        self.helper()",
            "b.py:2:1:helper()",
            "b.py:3:1:# helper()",
            "garbage line",
            "b.py:4:3:  obj.helper()",
        ]);
        let usages = parse_usages(&lines, &matcher, UsageFilter::default(), "a.py");

        let got: Vec<(String, CallType, &str)> = usages
            .iter()
            .map(|u| (u.location.to_string(), u.call_type, u.context.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                ("a.py:1:5".to_string(), CallType::Definition, "def helper():"),
                ("a.py:5:9".to_string(), CallType::Instance, "self.helper()"),
                ("b.py:2:1".to_string(), CallType::Function, "helper()"),
            ]
        );
    }

    #[test]
    fn test_parse_usages_skip_imports() {
        let matcher = CallMatcher::new("helper");
        let lines = raw(&["b.py:1:1:from pkg import helper; helper()", "b.py:2:1:helper()"]);

        let kept = parse_usages(&lines, &matcher, UsageFilter::default(), "a.py");
        assert_eq!(kept.len(), 2);

        let filter = UsageFilter {
            skip_imports: true,
            ..UsageFilter::default()
        };
        let kept = parse_usages(&lines, &matcher, filter, "a.py");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].location, Location::new("b.py", 2, 1));
    }

    #[test]
    fn test_parse_usages_skip_definitions_drops_own_file_only() {
        let matcher = CallMatcher::new("run");
        let lines = raw(&["a.py:3:5:def run(self):", "b.py:7:5:def run(self):", "c.py:1:1:run()"]);
        let filter = UsageFilter {
            skip_definitions: true,
            ..UsageFilter::default()
        };

        let kept = parse_usages(&lines, &matcher, filter, "a.py");
        let files: Vec<&str> = kept.iter().map(|u| u.location.file.as_str()).collect();
        assert_eq!(files, vec!["b.py", "c.py"]);
    }

    #[test]
    fn test_analyze_definition_counts() {
        let backend = CannedBackend::new(vec![(
            "helper",
            vec!["a.py:1:5:def helper():", "a.py:4:9:        self.helper()", "b.py:2:1:helper()"],
        )]);
        let record = analyze_definition(
            Definition::new("helper", "a.py", 1),
            Path::new("."),
            UsageFilter::default(),
            &backend,
        );

        assert_eq!(record.total_usages, 3);
        assert_eq!(record.count(CallType::Definition), 1);
        assert_eq!(record.count(CallType::Instance), 1);
        assert_eq!(record.count(CallType::Function), 1);
        assert_eq!(record.counts_by_type.values().sum::<usize>(), record.usages.len());
    }

    #[test]
    fn test_analyze_definition_search_failure_is_empty() {
        let backend = CannedBackend::new(vec![]);
        let def = Definition::new("ghost", "a.py", 1);
        let record = analyze_definition(def.clone(), Path::new("."), UsageFilter::default(), &backend);
        assert_eq!(record, UsageRecord::empty(def));
    }

    #[test]
    fn test_analyze_usages_one_record_per_definition() {
        let backend = CannedBackend::new(vec![
            ("alpha", vec!["a.py:1:5:def alpha():", "b.py:1:1:alpha()"]),
            ("beta", vec![]),
        ]);
        let definitions = vec![
            Definition::new("alpha", "a.py", 1),
            Definition::new("beta", "a.py", 4),
            Definition::new("broken", "a.py", 8),
        ];

        let mut records =
            analyze_usages(definitions, Path::new("."), UsageFilter::default(), &backend, Some(2))
                .unwrap();
        records.sort_by(|a, b| a.definition.name.cmp(&b.definition.name));

        assert_eq!(backend.calls.load(Ordering::Relaxed), 3);
        let totals: Vec<(&str, usize)> = records
            .iter()
            .map(|r| (r.definition.name.as_str(), r.total_usages))
            .collect();
        assert_eq!(totals, vec![("alpha", 2), ("beta", 0), ("broken", 0)]);
    }

    #[test]
    fn test_analyze_usages_empty_input() {
        let backend = CannedBackend::new(vec![]);
        let records =
            analyze_usages(Vec::new(), Path::new("."), UsageFilter::default(), &backend, None).unwrap();
        assert!(records.is_empty());
        assert_eq!(backend.calls.load(Ordering::Relaxed), 0);
    }
}
