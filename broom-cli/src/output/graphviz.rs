//! Graphviz `digraph` of which files use which definitions.
//!
//! Definitions become `<file stem>:<name>` nodes and every file that uses
//! one becomes a `<file stem>:<module>` node with an edge to it. Nodes and
//! edges are deduplicated and emitted in sorted order.

use broom_core::UsageRecord;
use std::collections::BTreeSet;
use std::path::Path;

/// Graphviz formatter
pub struct GraphvizOutput;

fn node_name(file: &str, symbol: &str) -> String {
    let path = Path::new(file);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file.to_string());
    format!("{}:{}", stem, symbol)
}

impl GraphvizOutput {
    pub fn format(records: &[UsageRecord]) -> String {
        let mut nodes = BTreeSet::new();
        let mut edges = BTreeSet::new();

        for record in records {
            let callee = node_name(&record.definition.file, &record.definition.name);
            nodes.insert(callee.clone());

            for usage in &record.usages {
                if usage.location.file.is_empty() {
                    continue;
                }
                let caller = node_name(&usage.location.file, "<module>");
                nodes.insert(caller.clone());
                edges.insert((caller, callee.clone()));
            }
        }

        let mut out = String::new();
        out.push_str("digraph G {\n");
        out.push_str("  rankdir=LR;\n");
        out.push_str("  node [shape=box, fontsize=10];\n");
        for node in &nodes {
            out.push_str(&format!("  {:?};\n", node));
        }
        for (caller, callee) in &edges {
            out.push_str(&format!("  {:?} -> {:?};\n", caller, callee));
        }
        out.push_str("}\n");
        out
    }
}
