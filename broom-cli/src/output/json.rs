//! JSON output formatting for machine-readable output.

use serde::Serialize;

/// JSON output formatter
pub struct JsonOutput;

impl JsonOutput {
    /// Pretty-print `data` followed by a newline.
    pub fn format<T: Serialize + ?Sized>(data: &T) -> String {
        let mut out = serde_json::to_string_pretty(data)
            .unwrap_or_else(|e| format!("{{\n  \"error\": \"{}\"\n}}", e));
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::sample_result;
    use super::*;

    #[test]
    fn test_result_shape() {
        let output = JsonOutput::format(&sample_result());
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["total_methods"], 2);
        assert_eq!(json["total_files"], 3);

        let first = &json["results"][0];
        assert_eq!(first["method"]["name"], "helper");
        assert_eq!(first["method"]["filename"], "pkg/app.py");
        assert_eq!(first["method"]["line_number"], 1);
        assert_eq!(first["total_usages"], 3);
        assert_eq!(first["usages_by_type"]["instance"], 1);
        assert_eq!(first["usages"][1]["location"], "pkg/app.py:7:21");
        assert_eq!(first["usages"][1]["call_type"], "instance");
    }

    #[test]
    fn test_pretty_printed() {
        let output = JsonOutput::format(&sample_result());
        assert!(output.contains("\n  \"total_files\""));
        assert!(output.ends_with("}\n"));
    }
}
