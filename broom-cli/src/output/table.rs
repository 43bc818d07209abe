//! Table output formatting using the `tabled` crate.
//!
//! One row per definition with its location, total and per-call-type
//! counts. The table is fitted to the terminal width when truncation is on.

use super::{truncate, OutputConfig};
use broom_core::{CallType, UsageRecord};
use tabled::{
    builder::Builder,
    settings::{object::Columns, style::Style, Alignment, Modify, Width},
};

/// Widest a method name or location cell may get before it is cut.
const MAX_TEXT_WIDTH: usize = 48;

/// Table output formatter
pub struct TableOutput;

impl TableOutput {
    pub fn format(records: &[UsageRecord], config: &OutputConfig) -> String {
        if records.is_empty() {
            return "(no results)\n".to_string();
        }

        let mut builder = Builder::default();

        let mut header = vec!["Method".to_string(), "Location".to_string(), "Total".to_string()];
        header.extend(CallType::ALL.iter().map(|ct| ct.as_str().to_string()));
        builder.push_record(header);

        for record in records {
            let mut row = vec![
                Self::cell(&record.definition.name, config),
                Self::cell(&record.definition.location(), config),
                record.total_usages.to_string(),
            ];
            row.extend(CallType::ALL.iter().map(|ct| record.count(*ct).to_string()));
            builder.push_record(row);
        }

        let mut table = builder.build();
        table.with(Style::rounded());
        table.with(Modify::new(Columns::new(2..)).with(Alignment::right()));

        if config.should_truncate() {
            table.with(Width::wrap(config.effective_width()));
        }

        format!("{}\n", table)
    }

    fn cell(value: &str, config: &OutputConfig) -> String {
        if config.should_truncate() {
            truncate(value, MAX_TEXT_WIDTH)
        } else {
            value.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::sample_records;
    use super::super::OutputFormat;
    use super::*;

    #[test]
    fn test_table_rows() {
        let config = OutputConfig::for_file(OutputFormat::Table);
        let out = TableOutput::format(&sample_records(), &config);

        assert!(out.contains("Method"));
        assert!(out.contains("definition"));
        assert!(out.contains("decorator"));
        assert!(out.contains("helper"));
        assert!(out.contains("pkg/app.py:1"));
        assert!(out.contains("orphan"));
        assert!(out.contains("pkg/util.py:4"));
        // header, two records
        assert_eq!(out.lines().filter(|l| l.starts_with('│')).count(), 3);
    }

    #[test]
    fn test_table_empty() {
        let config = OutputConfig::for_file(OutputFormat::Table);
        assert_eq!(TableOutput::format(&[], &config), "(no results)\n");
    }

    #[test]
    fn test_long_names_truncated_on_terminal() {
        let mut records = sample_records();
        records[0].definition.name = "x".repeat(100);

        let config = OutputConfig::new(OutputFormat::Table).with_width(400);
        let out = TableOutput::format(&records, &config);
        assert!(out.contains(&format!("{}...", "x".repeat(MAX_TEXT_WIDTH - 3))));

        let config = OutputConfig::for_file(OutputFormat::Table);
        let out = TableOutput::format(&records, &config);
        assert!(out.contains(&"x".repeat(100)));
    }
}
