//! Inspection result formatters.
//!
//! A formatter turns each [`InspectionRun`] into a section and wraps the
//! sections into the final output. Formatters are addressed by a short alias;
//! asking for an unknown alias is an error surfaced before anything runs.

use colored::Colorize;
use comfy_table::{ContentArrangement, Table, presets};
use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    analyser::{CellValue, InspectionRun},
    error::{AppResult, unknown_formatter_error}
};

/// Formatter alias used when none is requested
pub const DEFAULT_FORMATTER: &str = "table";

/// Every registered formatter alias
pub const KNOWN_FORMATTERS: [&str; 3] = ["table", "json", "yaml"];

/// Formats inspection runs into a printable string
pub trait Formatter: std::fmt::Debug {
    /// Format one inspection run into a section
    fn format(&self, run: &InspectionRun, human: bool) -> String;

    /// Wrap multiple sections into a single output string
    fn wrap(&self, sections: Vec<String>) -> String;
}

/// Look up a formatter by alias
pub fn by_alias(alias: &str) -> AppResult<Box<dyn Formatter>> {
    match alias {
        "table" => Ok(Box::new(TableFormatter)),
        "json" => Ok(Box::new(JsonFormatter)),
        "yaml" => Ok(Box::new(YamlFormatter)),
        other => Err(unknown_formatter_error(other, &KNOWN_FORMATTERS))
    }
}

/// Format a whole run sequence with the given formatter
pub fn format_runs(formatter: &dyn Formatter, runs: &[InspectionRun], human: bool) -> String {
    let sections = runs.iter().map(|run| formatter.format(run, human)).collect();
    formatter.wrap(sections)
}

/// Returns human readable size, e.g. `117.74 MB`
pub fn humanize_size(bytes: i64) -> String {
    const NAMES: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

    if bytes <= 0 {
        return String::from("0 B");
    }

    let mut idx = 0;
    let mut size = bytes as f64;
    while size >= 1024.0 && idx < NAMES.len() - 1 {
        size /= 1024.0;
        idx += 1;
    }

    let text = format!("{:.2}", size);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", text, NAMES[idx])
}

/// Result rows with size columns humanized when requested
fn processed_rows(run: &InspectionRun, human: bool) -> Vec<Vec<CellValue>> {
    let Some(result) = &run.result else {
        return Vec::new();
    };

    let humanized: Vec<bool> = result
        .columns
        .iter()
        .map(|name| human && name.contains("size"))
        .collect();

    result
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(idx, cell)| match cell {
                    CellValue::Int(bytes) if humanized[idx] => {
                        CellValue::Text(humanize_size(*bytes))
                    }
                    other => other.clone()
                })
                .collect()
        })
        .collect()
}

/// Serializable view of one run for the structured formatters
#[derive(Serialize)]
struct Record<'a> {
    title:     &'a str,
    alias:     &'a str,
    arguments: &'a IndexMap<String, String>,
    errors:    &'a [String],
    result:    Option<RecordResult<'a>>
}

#[derive(Serialize)]
struct RecordResult<'a> {
    columns: &'a [String],
    rows:    Vec<Vec<CellValue>>
}

fn record<'a>(run: &'a InspectionRun, human: bool) -> Record<'a> {
    Record {
        title:     &run.title,
        alias:     &run.alias,
        arguments: &run.arguments,
        errors:    &run.errors,
        result:    run.result.as_ref().map(|result| RecordResult {
            columns: &result.columns,
            rows:    processed_rows(run, human)
        })
    }
}

/// Format inspection results as titled tables
#[derive(Debug)]
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format(&self, run: &InspectionRun, human: bool) -> String {
        let mut out = format!(
            "{}\n\n",
            format!("{} [{}]", run.title, run.alias).cyan().bold()
        );

        if run.failed() {
            let lines: Vec<String> = run
                .errors
                .iter()
                .map(|error| format!("{} {}", "!".red(), error.red()))
                .collect();
            out.push_str(&lines.join("\n"));
            return out;
        }

        let Some(result) = &run.result else {
            return out;
        };

        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(result.columns.iter().map(|name| column_title(name)));

        for row in processed_rows(run, human) {
            table.add_row(row.iter().map(|cell| cell.to_string()));
        }

        out.push_str(&table.to_string());
        out
    }

    fn wrap(&self, sections: Vec<String>) -> String {
        sections.join("\n\n\n")
    }
}

/// Format inspection results as a JSON array
#[derive(Debug)]
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, run: &InspectionRun, human: bool) -> String {
        serde_json::to_string(&record(run, human)).unwrap_or_default()
    }

    fn wrap(&self, sections: Vec<String>) -> String {
        format!("[{}]", sections.join(","))
    }
}

/// Format inspection results as YAML documents
#[derive(Debug)]
pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn format(&self, run: &InspectionRun, human: bool) -> String {
        serde_yaml::to_string(&record(run, human)).unwrap_or_default()
    }

    fn wrap(&self, sections: Vec<String>) -> String {
        sections.join("---\n")
    }
}

/// Column header text: underscores to spaces, first letter capitalized
fn column_title(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => spaced
    }
}
