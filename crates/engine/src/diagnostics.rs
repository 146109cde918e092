// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Linter output parsing.

use parking_lot::Mutex;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use tidy_core::{Diagnostic, DiagnosticFormat, OutputStream, Severity, ToolName};

/// `path:line[:col]: [severity[:]] message`
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static LOCATION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:[^:\s][^:]*:)??(?P<line>\d+):(?:(?P<col>\d+):)?\s*",
        r"(?:(?P<severity>error|warning|warn|info|note|hint)\b:?\s*)?",
        r"(?P<message>.+)$",
    ))
    .expect("constant regex pattern is valid")
});

// Leading rule code such as `E501` or `[no-unused-vars]`
#[allow(clippy::expect_used)]
static CODE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\[(?P<bracketed>[^\]]+)\]|(?P<bare>[A-Z]+[0-9]+))\s+(?P<rest>.+)$")
        .expect("constant regex pattern is valid")
});

/// Select the configured output stream(s).
pub fn stream_text(stream: OutputStream, stdout: &str, stderr: &str) -> String {
    match stream {
        OutputStream::Stdout => stdout.to_string(),
        OutputStream::Stderr => stderr.to_string(),
        OutputStream::Both if stdout.is_empty() => stderr.to_string(),
        OutputStream::Both if stderr.is_empty() => stdout.to_string(),
        OutputStream::Both => format!("{stdout}\n{stderr}"),
    }
}

/// Turns linter output into diagnostics; compiled regexes are cached by pattern.
#[derive(Default)]
pub struct DiagnosticParser {
    regexes: Mutex<HashMap<String, Arc<Regex>>>,
}

impl DiagnosticParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(
        &self,
        source: &ToolName,
        format: &DiagnosticFormat,
        text: &str,
    ) -> Result<Vec<Diagnostic>, String> {
        match format {
            DiagnosticFormat::Lines => Ok(parse_lines(source, text)),
            DiagnosticFormat::Regex { pattern } => {
                let regex = self.regex(pattern)?;
                Ok(parse_regex(source, &regex, text))
            }
            DiagnosticFormat::Json => parse_json(source, text),
        }
    }

    fn regex(&self, pattern: &str) -> Result<Arc<Regex>, String> {
        let mut cache = self.regexes.lock();
        if let Some(regex) = cache.get(pattern) {
            return Ok(Arc::clone(regex));
        }
        let regex = Arc::new(Regex::new(pattern).map_err(|e| e.to_string())?);
        cache.insert(pattern.to_string(), Arc::clone(&regex));
        Ok(regex)
    }
}

/// One diagnostic per non-empty line.
pub fn parse_lines(source: &ToolName, text: &str) -> Vec<Diagnostic> {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .map(|line| match LOCATION_LINE.captures(line) {
            Some(caps) => {
                let severity = caps
                    .name("severity")
                    .and_then(|s| Severity::parse(s.as_str()))
                    .unwrap_or_default();
                let (code, message) = split_code(&caps["message"]);
                let mut diagnostic = Diagnostic::new(source.clone(), severity, message)
                    .at(number(caps.name("line")), number(caps.name("col")));
                diagnostic.code = code;
                diagnostic
            }
            None => Diagnostic::new(source.clone(), Severity::default(), line.trim()),
        })
        .collect()
}

fn split_code(message: &str) -> (Option<String>, String) {
    match CODE_PREFIX.captures(message) {
        Some(caps) => {
            let code = caps.name("bracketed").or_else(|| caps.name("bare")).map(|m| m.as_str());
            (code.map(str::to_string), caps["rest"].to_string())
        }
        None => (None, message.to_string()),
    }
}

fn number(m: Option<regex::Match<'_>>) -> Option<u32> {
    m.and_then(|m| m.as_str().parse().ok())
}

/// Lines matching `regex`; non-matching lines are ignored.
pub fn parse_regex(source: &ToolName, regex: &Regex, text: &str) -> Vec<Diagnostic> {
    text.lines()
        .filter_map(|line| regex.captures(line))
        .filter_map(|caps| {
            let message = caps.name("message")?.as_str().trim();
            let severity = caps
                .name("severity")
                .and_then(|s| Severity::parse(s.as_str()))
                .unwrap_or_default();
            let mut diagnostic = Diagnostic::new(source.clone(), severity, message)
                .at(number(caps.name("line")), number(caps.name("col")));
            diagnostic.code = caps.name("code").map(|c| c.as_str().to_string());
            Some(diagnostic)
        })
        .collect()
}

/// A JSON array of diagnostic objects, or an object with a `diagnostics` array.
///
/// Field names follow common linter output: `line`/`row`, `column`/`col`,
/// `severity`/`level`, `message`/`msg`, `code`/`rule`. A nested `location`
/// object is also consulted for positions.
pub fn parse_json(source: &ToolName, text: &str) -> Result<Vec<Diagnostic>, String> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: Value = serde_json::from_str(text).map_err(|e| format!("invalid JSON output: {e}"))?;
    let items = match &value {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("diagnostics") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => return Err("expected a JSON array of diagnostics".to_string()),
        },
        _ => return Err("expected a JSON array of diagnostics".to_string()),
    };
    Ok(items.iter().filter_map(|item| json_diagnostic(source, item)).collect())
}

fn json_diagnostic(source: &ToolName, item: &Value) -> Option<Diagnostic> {
    let field = |names: &[&str]| names.iter().find_map(|n| item.get(*n));
    let message = field(&["message", "msg"])?.as_str()?;
    let location = item.get("location");
    let position = |names: &[&str]| {
        field(names)
            .or_else(|| location.and_then(|l| names.iter().find_map(|n| l.get(*n))))
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
    };
    let severity = field(&["severity", "level"])
        .and_then(|s| match s {
            Value::String(s) => Severity::parse(s),
            // eslint: 2 = error, 1 = warning
            Value::Number(n) => match n.as_u64() {
                Some(2) => Some(Severity::Error),
                Some(1) => Some(Severity::Warning),
                _ => None,
            },
            _ => None,
        })
        .unwrap_or_default();
    let code = field(&["code", "rule", "ruleId"]).and_then(|c| match c {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    });
    let mut diagnostic = Diagnostic::new(source.clone(), severity, message)
        .at(position(&["line", "row"]), position(&["column", "col"]));
    diagnostic.code = code;
    Some(diagnostic)
}

#[cfg(test)]
#[path = "diagnostics_tests.rs"]
mod tests;
