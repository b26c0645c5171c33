//! Output formatters for run summaries.
//!
//! Summaries go to stderr as JSON, compact text or colorized pretty output,
//! leaving stdout to the generated module.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use stubgen_core::cli::OutputFormat;

/// Formats data in the requested output format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Examples
///
/// ```
/// use stubgen_cli::formatters::format_output;
/// use stubgen_codegen::{GenerationReport, Surface};
/// use stubgen_core::cli::OutputFormat;
///
/// let report = GenerationReport::new(Surface::Realtime);
/// let output = format_output(&report, OutputFormat::Json)?;
/// assert!(output.contains("\"surface\": \"realtime\""));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(data),
        OutputFormat::Text => text::format(data),
        OutputFormat::Pretty => pretty::format(data),
    }
}

/// JSON output formatting.
pub mod json {
    use super::{Result, Serialize};

    /// Formats data as indented JSON.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }

    /// Formats data as single-line JSON.
    pub fn format_compact<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string(data)?)
    }
}

/// Plain text output formatting.
pub mod text {
    use super::{Result, Serialize, json};

    /// Formats data as one line without colors, for scripts.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        json::format_compact(data)
    }
}

/// Pretty (human-readable) output formatting.
pub mod pretty {
    use super::{Colorize, Result, Serialize};
    use serde_json::Value;

    /// Formats data as colorized, indented output.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut out = String::new();
        write_value(&mut out, &value, 0);
        Ok(out)
    }

    fn write_value(out: &mut String, value: &Value, indent: usize) {
        let indent_str = "  ".repeat(indent);
        let next_indent_str = "  ".repeat(indent + 1);

        match value {
            Value::Null => out.push_str(&"null".dimmed().to_string()),
            Value::Bool(b) => out.push_str(&b.to_string().yellow().to_string()),
            Value::Number(n) => out.push_str(&n.to_string().cyan().to_string()),
            Value::String(s) => {
                out.push('"');
                out.push_str(&s.green().to_string());
                out.push('"');
            }
            Value::Array(items) if items.is_empty() => out.push_str("[]"),
            Value::Array(items) => {
                out.push_str("[\n");
                for (i, item) in items.iter().enumerate() {
                    out.push_str(&next_indent_str);
                    write_value(out, item, indent + 1);
                    if i + 1 < items.len() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                out.push_str(&indent_str);
                out.push(']');
            }
            Value::Object(map) if map.is_empty() => out.push_str("{}"),
            Value::Object(map) => {
                out.push_str("{\n");
                for (i, (key, val)) in map.iter().enumerate() {
                    out.push_str(&next_indent_str);
                    out.push('"');
                    out.push_str(&key.blue().bold().to_string());
                    out.push_str("\": ");
                    write_value(out, val, indent + 1);
                    if i + 1 < map.len() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                out.push_str(&indent_str);
                out.push('}');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stubgen_codegen::{GenerationReport, SkippedEntity, Surface};
    use stubgen_core::EntityKind;

    fn report() -> GenerationReport {
        let mut report = GenerationReport::new(Surface::Rest);
        report.record_generated(EntityKind::Endpoint, "healthcheck");
        report.record_skip(SkippedEntity::new(
            EntityKind::Endpoint,
            "GET /v2/broken",
            "missing operationId",
        ));
        report.bytes = 128;
        report
    }

    #[test]
    fn test_json_format() {
        let output = json::format(&report()).unwrap();
        assert!(output.contains("\"surface\": \"rest\""));
        assert!(output.contains("\"bytes\": 128"));
        assert!(output.contains("GET /v2/broken"));
    }

    #[test]
    fn test_text_format_single_line() {
        let output = text::format(&report()).unwrap();
        assert!(!output.contains('\n'));
        assert!(output.contains("\"name\":\"healthcheck\""));
    }

    #[test]
    fn test_pretty_format() {
        colored::control::set_override(false);
        let output = pretty::format(&report()).unwrap();
        assert!(output.starts_with("{\n"));
        assert!(output.contains("\"surface\": \"rest\""));
        assert!(output.contains("\"collisions\": []"));
        assert!(output.contains("\"bytes\": 128"));
    }

    #[test]
    fn test_format_output_dispatch() {
        let data = report();
        assert!(format_output(&data, OutputFormat::Json).unwrap().contains('\n'));
        assert!(!format_output(&data, OutputFormat::Text).unwrap().contains('\n'));
        assert!(format_output(&data, OutputFormat::Pretty).unwrap().contains("healthcheck"));
    }
}
