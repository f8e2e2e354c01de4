//! Output formatting.

use crate::orchestrator::{BatchReport, FileDiagnostic, Timings};
use serde::Serialize;
use std::collections::BTreeMap;
use vue_transformer::Severity;

/// A formatted diagnostic for JSON output.
#[derive(Debug, Serialize)]
pub struct FormattedDiagnostic {
    /// The diagnostic type (Error, Warning).
    #[serde(rename = "type")]
    pub diagnostic_type: String,
    /// The `.vue` file path.
    pub filename: String,
    /// The start position, when the diagnostic has a location.
    pub start: Option<Position>,
    pub message: String,
    pub code: String,
}

/// A position in the source.
#[derive(Debug, Serialize)]
pub struct Position {
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed column number.
    pub column: u32,
    /// Byte offset.
    pub offset: u32,
}

#[derive(Debug, Serialize)]
struct FormattedFile {
    input: String,
    component: String,
    stylesheet: String,
}

#[derive(Debug, Serialize)]
struct FormattedFailure {
    filename: String,
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FormattedReport<'a> {
    converted: Vec<FormattedFile>,
    failures: Vec<FormattedFailure>,
    diagnostics: Vec<FormattedDiagnostic>,
    custom_tags: &'a BTreeMap<String, usize>,
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "Error",
        Severity::Warning => "Warning",
    }
}

/// Formats the report as human-readable text.
pub fn format_human(report: &BatchReport, verbose: bool) -> String {
    let mut output = String::new();

    if verbose {
        for file in &report.converted {
            output.push_str(&format!(
                "Converted {} -> {}\n",
                file.input, file.outputs.component
            ));
        }
        if !report.converted.is_empty() {
            output.push('\n');
        }
    }

    for diag in &report.diagnostics {
        output.push_str(&format_diagnostic(diag));
    }

    for failure in &report.failures {
        output.push_str(&format!("{}\nError: {}\n\n", failure.path, failure.error));
    }

    if !report.tag_tally.is_empty() {
        let mut tags: Vec<_> = report.tag_tally.iter().collect();
        tags.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        output.push_str("Custom tags (convert and import these components):\n");
        for (tag, count) in tags {
            output.push_str(&format!("  {} ({})\n", tag, count));
        }
        output.push('\n');
    }

    output.push_str(&format_summary(report));
    output.push('\n');
    output
}

fn format_diagnostic(diag: &FileDiagnostic) -> String {
    let location = match diag.position {
        Some(pos) => format!("{}:{}:{}", diag.path, pos.line + 1, pos.col + 1),
        None => diag.path.to_string(),
    };
    format!(
        "{}\n{}: {} ({})\n\n",
        location,
        severity_label(diag.diagnostic.severity),
        diag.diagnostic.message,
        diag.diagnostic.code
    )
}

/// Formats the summary line.
pub fn format_summary(report: &BatchReport) -> String {
    fn plural(count: usize, word: &str) -> String {
        if count == 1 {
            format!("{} {}", count, word)
        } else {
            format!("{} {}s", count, word)
        }
    }

    format!(
        "====================================\nvue-to-react converted {}, {} failed, with {} and {}",
        plural(report.converted.len(), "file"),
        report.failures.len(),
        plural(report.error_count(), "error"),
        plural(report.warning_count(), "warning")
    )
}

/// Formats the report as JSON.
pub fn format_json(report: &BatchReport) -> String {
    let formatted = FormattedReport {
        converted: report
            .converted
            .iter()
            .map(|file| FormattedFile {
                input: file.input.to_string(),
                component: file.outputs.component.to_string(),
                stylesheet: file.outputs.stylesheet.to_string(),
            })
            .collect(),
        failures: report
            .failures
            .iter()
            .map(|failure| FormattedFailure {
                filename: failure.path.to_string(),
                message: failure.error.to_string(),
            })
            .collect(),
        diagnostics: report.diagnostics.iter().map(format_json_diagnostic).collect(),
        custom_tags: &report.tag_tally,
    };
    serde_json::to_string_pretty(&formatted).unwrap_or_default()
}

fn format_json_diagnostic(diag: &FileDiagnostic) -> FormattedDiagnostic {
    let start = match (diag.position, diag.diagnostic.span) {
        (Some(pos), Some(span)) => Some(Position {
            line: pos.line + 1,
            column: pos.col + 1,
            offset: u32::from(span.start),
        }),
        _ => None,
    };
    FormattedDiagnostic {
        diagnostic_type: severity_label(diag.diagnostic.severity).to_string(),
        filename: diag.path.to_string(),
        start,
        message: diag.diagnostic.message.clone(),
        code: diag.diagnostic.code.to_string(),
    }
}

/// Formats phase timings.
pub fn format_timings(timings: &Timings) -> String {
    format!(
        "=== vue-to-react timings ===\nfile scan: {:?} ({} files)\nconversion: {:?}\ntotal: {:?}\n",
        timings.scan, timings.file_count, timings.convert, timings.total
    )
}
