// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured linter findings.

use crate::tool::ToolName;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    #[default]
    Warning,
    Info,
    Hint,
}

crate::simple_display! {
    Severity {
        Error => "error",
        Warning => "warning",
        Info => "info",
        Hint => "hint",
    }
}

impl Severity {
    /// Parse the severity spellings linters commonly emit.
    ///
    /// Accepts full words and single-letter codes (`E`, `W`, `I`, `H`/`N`),
    /// case-insensitively. Returns `None` for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" | "err" | "e" | "fatal" | "critical" => Some(Severity::Error),
            "warning" | "warn" | "w" => Some(Severity::Warning),
            "info" | "information" | "i" | "note" => Some(Severity::Info),
            "hint" | "h" | "n" | "style" => Some(Severity::Hint),
            _ => None,
        }
    }
}

/// One finding reported by a linter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Tool that reported it
    pub source: ToolName,
    /// 1-based line, when the tool reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// 1-based column, when the tool reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Diagnostic {
    pub fn new(
        source: impl Into<ToolName>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            line: None,
            column: None,
            severity,
            message: message.into(),
            code: None,
        }
    }

    pub fn at(mut self, line: Option<u32>, column: Option<u32>) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    crate::setters! {
        option { code: String }
    }
}

#[cfg(test)]
#[path = "diagnostic_tests.rs"]
mod tests;
