//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! # Output Format
//!
//! ```text
//! Variables
//!     001 bodyBgColor (Colors, color) = #ffffff
//!     002 bodyFont (Fonts, font) = normal normal 16px system-ui, sans-serif
//!
//! Skipped annotations
//!     line 14: missing attribute `default`
//!
//! Markers
//!     posts loop: replaced
//!     header: replaced
//!     sidebar: not found
//! ```

use crate::annotations::Extraction;
use crate::fragments::{MarkerReport, MarkerStatus};
use crate::pipeline::BuildReport;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format the declarations and skipped annotations of a style sheet.
pub fn format_variables(extraction: &Extraction) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Variables".to_string());
    if extraction.variables.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, var) in extraction.variables.iter().enumerate() {
        lines.push(format!(
            "{}{} {} ({}, {}) = {}",
            indent(1),
            format_index(i + 1),
            var.name,
            var.group,
            var.kind,
            var.default
        ));
    }

    if !extraction.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped annotations".to_string());
        for skipped in &extraction.skipped {
            lines.push(format!(
                "{}line {}: {}",
                indent(1),
                skipped.line,
                skipped.reason
            ));
        }
    }

    lines
}

fn marker_line(report: &MarkerReport) -> String {
    let status = match report.status {
        MarkerStatus::Replaced(1) => "replaced".to_string(),
        MarkerStatus::Replaced(n) => format!("replaced ({n} times)"),
        MarkerStatus::NotFound => "not found".to_string(),
        MarkerStatus::Unterminated => "start marker without end, left as is".to_string(),
    };
    format!("{}{}: {}", indent(1), report.marker, status)
}

/// Format the result of `build` or `check`.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = format_variables(&report.extraction);

    lines.push(String::new());
    lines.push("Markers".to_string());
    lines.extend(report.markers.iter().map(marker_line));

    lines.push(String::new());
    if report.written {
        lines.push(format!(
            "Theme successfully built at '{}' ({} bytes)",
            report.output.display(),
            report.bytes
        ));
    } else {
        lines.push(format!(
            "Theme is valid ({} bytes, not written)",
            report.bytes
        ));
    }

    lines
}

/// Print variables output to stdout.
pub fn print_variables(extraction: &Extraction) {
    for line in format_variables(extraction) {
        println!("{}", line);
    }
}

/// Print build output to stdout.
pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}
