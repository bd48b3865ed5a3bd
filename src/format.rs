//! Output formatting for runtimes, variable tables and overlay reports.

use crate::config::{FieldDescriptor, OverlayReport, Runtime};
use anyhow::Result;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Markdown,
}

/// Render a runtime. Markdown falls back to a YAML code block.
pub fn format_runtime(runtime: &Runtime, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(runtime)?,
        OutputFormat::Yaml => serde_yaml::to_string(runtime)?,
        OutputFormat::Markdown => {
            format!("```yaml\n{}```\n", serde_yaml::to_string(runtime)?)
        }
    })
}

/// Format the field table as a markdown table.
pub fn format_fields_markdown(fields: &[FieldDescriptor]) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Runtime variables ({})\n\n", fields.len()));
    md.push_str("| variable | field | kind | current |\n");
    md.push_str("|---|---|---|---|\n");

    for field in fields {
        let variable = match field.variable {
            Some(ref v) => format!("`{}`", v),
            None => "-".to_string(),
        };
        let current = field.current.as_deref().unwrap_or("");
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            variable, field.field, field.kind, current
        ));
    }

    md
}

fn field_rows(fields: &[FieldDescriptor]) -> Vec<serde_json::Value> {
    fields
        .iter()
        .map(|f| {
            serde_json::json!({
                "field": f.field,
                "variable": f.variable,
                "kind": f.kind.to_string(),
                "optional": f.optional,
                "current": f.current,
            })
        })
        .collect()
}

/// Format the field table as JSON.
pub fn format_fields_json(fields: &[FieldDescriptor]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&field_rows(fields))?)
}

/// Format the field table as YAML.
pub fn format_fields_yaml(fields: &[FieldDescriptor]) -> Result<String> {
    Ok(serde_yaml::to_string(&field_rows(fields))?)
}

/// Format the field table in the requested format.
pub fn format_fields(fields: &[FieldDescriptor], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => format_fields_json(fields),
        OutputFormat::Yaml => format_fields_yaml(fields),
        OutputFormat::Markdown => Ok(format_fields_markdown(fields)),
    }
}

/// Summarize an overlay report in one line per entry.
pub fn format_report(report: &OverlayReport) -> String {
    let mut out = String::new();
    for applied in &report.applied {
        out.push_str(&format!("override: {} <- {}\n", applied.field, applied.variable));
    }
    for warning in &report.warnings {
        out.push_str(&format!("warning: {}\n", warning));
    }
    out
}
