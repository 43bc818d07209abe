//! `path:line:col:context` lines, one per usage.
//!
//! Suitable for `vim -q`, `:cexpr` and other quickfix consumers.

use broom_core::UsageRecord;

/// Vimgrep formatter
pub struct VimgrepOutput;

/// Collapse all whitespace runs, newlines and tabs included, into single spaces.
pub fn sanitize_context(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl VimgrepOutput {
    pub fn format(records: &[UsageRecord]) -> String {
        let mut out = String::new();
        for record in records {
            for usage in &record.usages {
                let mut context = sanitize_context(&usage.context);
                if context.is_empty() {
                    context = format!("{} [{}]", record.definition.name, usage.call_type);
                }
                out.push_str(&format!("{}:{}\n", usage.location, context));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::sample_records;
    use super::*;
    use broom_core::{CallType, Definition, Location, Usage};

    #[test]
    fn test_sanitize_context() {
        assert_eq!(sanitize_context("  x =\thelper( a,\r\n b )  "), "x = helper( a, b )");
        assert_eq!(sanitize_context(" \t "), "");
    }

    #[test]
    fn test_one_line_per_usage() {
        let out = VimgrepOutput::format(&sample_records());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "pkg/app.py:1:5:def helper():",
                "pkg/app.py:7:21:return self.helper()",
                "pkg/main.py:3:9:value = helper()",
            ]
        );
    }

    #[test]
    fn test_empty_context_falls_back_to_name() {
        let record = UsageRecord::new(
            Definition::new("run", "a.py", 1),
            vec![Usage {
                location: Location::new("b.py", 2, 3),
                call_type: CallType::Static,
                context: "   ".to_string(),
            }],
        );
        assert_eq!(VimgrepOutput::format(&[record]), "b.py:2:3:run [static]\n");
    }
}
