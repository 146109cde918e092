// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Text rendering of plans, reports and diagnostics.

use crate::color;
use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;
use tidy_core::{Diagnostic, ExecutionPlan, ExecutionResult, RunReport};

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print `data` as pretty JSON, or run `text_fn` for text output.
pub fn format_or_json<T: Serialize>(
    format: OutputFormat,
    data: &T,
    text_fn: impl FnOnce(),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Text => {
            text_fn();
        }
    }
    Ok(())
}

/// One line per tool: `status tool (Nms)` plus the error, if any.
pub fn render_report(report: &RunReport) -> String {
    let mut out = String::new();
    if report.is_empty() {
        let _ = writeln!(out, "{}", color::muted(&format!("no applicable {}", report.kind)));
        return out;
    }
    for result in &report.results {
        let _ = writeln!(out, "{}", render_result(result));
    }
    if report.cancelled {
        let _ = writeln!(out, "{}", color::muted("(cancelled)"));
    }
    out
}

fn render_result(result: &ExecutionResult) -> String {
    let status = format!("{:<9}", result.status.to_string());
    let mut line = format!(
        "{} {} {}",
        color::status(result.status, &status),
        result.tool,
        color::muted(&format!("({}ms)", result.duration_ms))
    );
    if let Some(error) = &result.error_message {
        let _ = write!(line, ": {error}");
    }
    line
}

/// `file:line:col: severity: [code] message (tool)`, one per line.
pub fn render_diagnostics<'a>(
    file: &Path,
    diagnostics: impl IntoIterator<Item = &'a Diagnostic>,
) -> String {
    let mut out = String::new();
    for d in diagnostics {
        let _ = write!(out, "{}", file.display());
        if let Some(line) = d.line {
            let _ = write!(out, ":{line}");
            if let Some(column) = d.column {
                let _ = write!(out, ":{column}");
            }
        }
        let _ = write!(out, ": {}: ", color::severity(d.severity, &d.severity.to_string()));
        if let Some(code) = &d.code {
            let _ = write!(out, "[{code}] ");
        }
        let _ = writeln!(out, "{} {}", d.message, color::muted(&format!("({})", d.source)));
    }
    out
}

/// The plan header and every selected tool with its executable.
pub fn render_plan(plan: &ExecutionPlan) -> String {
    let mut out = String::new();
    let classifier = if plan.classifier.is_empty() { "-" } else { plan.classifier.as_str() };
    let _ = writeln!(
        out,
        "{} {} ({}, root {})",
        color::header(&plan.kind.to_string()),
        classifier,
        plan.mode,
        plan.project_root.display()
    );
    if plan.is_empty() {
        let _ = writeln!(out, "  {}", color::muted("no applicable tools"));
    }
    for entry in &plan.entries {
        let executable = entry.executable.display().to_string();
        let _ = write!(out, "  {} {}", entry.name(), color::muted(&executable));
        if let Some(config) = &entry.config_file {
            let _ = write!(out, " [{}]", config.display());
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
