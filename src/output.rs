use colored::Colorize;
use serde::Serialize;

use crate::executor::{CellValue, QueryOutcome};

/// Output format for results
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml
}

/// Output options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format:  OutputFormat,
    pub colored: bool
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format:  OutputFormat::Text,
            colored: true
        }
    }
}

/// Full report of one request for serialization
///
/// The generated SQL is always present, even when execution failed: showing
/// the statement next to its error is the debugging affordance this tool
/// exists for. Exactly one of the result fields or `error` is populated.
#[derive(Debug, Serialize)]
pub struct AskReport {
    pub sql:     String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows:    Option<Vec<Vec<CellValue>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error:   Option<String>
}

impl AskReport {
    /// Build a report from the generated SQL and its execution outcome
    pub fn new(sql: String, outcome: QueryOutcome) -> Self {
        match outcome {
            QueryOutcome::Rows(result) => Self {
                sql,
                columns: Some(result.columns),
                rows: Some(result.rows),
                error: None
            },
            QueryOutcome::Error(message) => Self {
                sql,
                columns: None,
                rows: None,
                error: Some(message)
            }
        }
    }
}

/// Format a full request report based on output options
pub fn format_report(report: &AskReport, opts: &OutputOptions) -> String {
    match opts.format {
        OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(report).unwrap_or_default(),
        OutputFormat::Text => format_text_report(report, opts)
    }
}

fn format_text_report(report: &AskReport, opts: &OutputOptions) -> String {
    let mut output = String::new();

    let header = "Generated SQL:";
    if opts.colored {
        output.push_str(&header.cyan().bold().to_string());
    } else {
        output.push_str(header);
    }
    output.push('\n');
    output.push_str(&report.sql);
    output.push_str("\n\n");

    if let Some(error) = &report.error {
        let message = format!("Error executing query: {}", error);
        if opts.colored {
            output.push_str(&message.red().to_string());
        } else {
            output.push_str(&message);
        }
        output.push('\n');
        return output;
    }

    let columns = report.columns.as_deref().unwrap_or_default();
    let rows = report.rows.as_deref().unwrap_or_default();
    if rows.is_empty() {
        output.push_str("No results found.\n");
    } else {
        output.push_str(&render_table(columns, rows, opts));
    }
    output
}

/// Render a result set as an ASCII table
///
/// Column widths follow the widest cell; the header row is bold when color
/// is enabled.
pub fn render_table(columns: &[String], rows: &[Vec<CellValue>], opts: &OutputOptions) -> String {
    let mut widths: Vec<usize> = columns.iter().map(String::len).collect();
    let rendered_rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(CellValue::to_string).collect())
        .collect();
    for row in &rendered_rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() && cell.len() > widths[i] {
                widths[i] = cell.len();
            }
        }
    }

    let mut table = String::new();

    let header: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{:<width$}", c, width = widths[i]))
        .collect();
    let header_line = header.join(" | ");
    if opts.colored {
        table.push_str(&header_line.bold().to_string());
    } else {
        table.push_str(&header_line);
    }
    table.push('\n');

    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    table.push_str(&separator.join("-+-"));
    table.push('\n');

    for row in &rendered_rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let width = widths.get(i).copied().unwrap_or(cell.len());
                format!("{:<width$}", cell, width = width)
            })
            .collect();
        table.push_str(line.join(" | ").trim_end());
        table.push('\n');
    }

    table
}
