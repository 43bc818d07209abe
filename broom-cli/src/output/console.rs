//! Human-readable console report.
//!
//! Each definition gets a block with its location, total usage count, a
//! per-call-type breakdown and the usages grouped by call type. A summary
//! of usage buckets and call type distribution closes the report.

use super::OutputConfig;
use broom_core::{CallType, UsageRecord};
use colored::{Color, Colorize};

const WIDTH: usize = 80;

/// Console report formatter
pub struct ConsoleOutput;

/// Applies colors only when enabled.
struct Painter {
    enabled: bool,
}

impl Painter {
    fn paint(&self, text: &str, color: Color) -> String {
        if self.enabled {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str, color: Option<Color>) -> String {
        if !self.enabled {
            return text.to_string();
        }
        match color {
            Some(color) => text.color(color).bold().to_string(),
            None => text.bold().to_string(),
        }
    }
}

/// Bucket color for a total usage count.
fn usage_count_color(count: usize) -> Color {
    match count {
        0 => Color::Yellow,
        1..=2 => Color::Red,
        3..=5 => Color::Yellow,
        _ => Color::Green,
    }
}

fn call_type_color(call_type: CallType) -> Color {
    match call_type {
        CallType::Definition | CallType::Decorator => Color::Magenta,
        CallType::Instance => Color::Green,
        CallType::Class => Color::Cyan,
        CallType::Static => Color::Blue,
        CallType::Function => Color::Yellow,
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

impl ConsoleOutput {
    /// Render every record followed by the summary block.
    pub fn format(records: &[UsageRecord], config: &OutputConfig) -> String {
        let painter = Painter {
            enabled: config.use_colors(),
        };
        let mut out = String::new();
        for record in records {
            Self::write_record(&mut out, record, &painter);
        }
        Self::write_summary(&mut out, records, &painter);
        out
    }

    fn write_record(out: &mut String, record: &UsageRecord, p: &Painter) {
        let def = &record.definition;
        let separator = "-".repeat(WIDTH);

        out.push_str(&format!("Method: {}\n", p.bold(&def.name, Some(Color::Cyan))));
        out.push_str(&format!("Defined in: {}\n", p.paint(&def.location(), Color::Blue)));
        out.push_str(&format!(
            "Total usages: {}\n",
            p.paint(&record.total_usages.to_string(), usage_count_color(record.total_usages))
        ));

        if record.total_usages == 0 {
            out.push_str(&format!("{}\n", p.paint("  (No usages found)", Color::Yellow)));
            out.push_str(&format!("{}\n", separator));
            return;
        }

        out.push_str(&format!("{}\n", p.bold("Usage breakdown:", None)));
        for call_type in CallType::ALL {
            let count = record.count(call_type);
            if count > 0 {
                let color = call_type_color(call_type);
                out.push_str(&format!(
                    "  - {}: {}\n",
                    p.paint(call_type.label(), color),
                    p.paint(&count.to_string(), color)
                ));
            }
        }

        for (call_type, usages) in record.grouped() {
            let header = format!("{}:", call_type.label());
            out.push_str(&format!("\n{}\n", p.bold(&header, Some(call_type_color(call_type)))));
            for usage in usages {
                out.push_str(&format!(
                    "  - {}\n",
                    p.paint(&usage.location.to_string(), Color::White)
                ));
                out.push_str(&format!("    {}\n", usage.context));
            }
        }

        out.push_str(&format!("{}\n", separator));
    }

    fn write_summary(out: &mut String, records: &[UsageRecord], p: &Painter) {
        let total = records.len();
        let (mut unused, mut low, mut medium, mut high) = (0, 0, 0, 0);
        for record in records {
            match record.total_usages {
                0 => unused += 1,
                1..=2 => low += 1,
                3..=5 => medium += 1,
                _ => high += 1,
            }
        }

        let separator = p.bold(&"=".repeat(WIDTH), None);
        out.push_str(&format!("\n{}\n", separator));
        out.push_str(&format!("{}\n", p.bold("SUMMARY", Some(Color::Cyan))));
        out.push_str(&format!("{}\n", separator));
        out.push_str(&format!(
            "Total methods analyzed: {}\n\n",
            p.bold(&total.to_string(), Some(Color::Green))
        ));

        out.push_str(&format!("{}\n", p.bold("Methods by usage count:", None)));
        let buckets = [
            ("Unused (0 usages)", unused, usage_count_color(0)),
            ("Low usage (1-2 usages)", low, usage_count_color(1)),
            ("Medium (3-5 usages)", medium, usage_count_color(3)),
            ("High usage (6+ usages)", high, usage_count_color(6)),
        ];
        for (label, count, color) in buckets {
            out.push_str(&format!(
                "  - {}: {} ({})\n",
                p.paint(label, color),
                p.paint(&count.to_string(), color),
                p.paint(&format!("{:.1}%", percent(count, total)), color)
            ));
        }

        out.push_str(&format!("\n{}\n", p.bold("Call type distribution:", None)));
        for call_type in CallType::ALL {
            if call_type == CallType::Definition {
                continue;
            }
            let count: usize = records.iter().map(|r| r.count(call_type)).sum();
            let color = call_type_color(call_type);
            out.push_str(&format!(
                "  - {}: {}\n",
                p.paint(call_type.label(), color),
                p.paint(&count.to_string(), color)
            ));
        }
        out.push_str(&format!("{}\n", separator));
    }
}
