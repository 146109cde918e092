// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-tool outcomes and the run report handed back to callers.

use crate::diagnostic::Diagnostic;
use crate::policy::SelectionMode;
use crate::tool::{ToolKind, ToolName};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Success,
    Failure,
    TimedOut,
    Skipped,
}

crate::simple_display! {
    ExecutionStatus {
        Success => "success",
        Failure => "failure",
        TimedOut => "timed_out",
        Skipped => "skipped",
    }
}

/// What a successful tool produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolOutput {
    Formatted { text: String, changed: bool },
    Diagnostics { items: Vec<Diagnostic> },
}

/// Outcome of one plan entry.
///
/// `error_message` is set exactly when `status` is not `Success`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    pub tool: ToolName,
    pub status: ExecutionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<ToolOutput>,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

impl ExecutionResult {
    pub fn formatted(tool: ToolName, text: String, changed: bool, elapsed: Duration) -> Self {
        Self {
            tool,
            status: ExecutionStatus::Success,
            output: Some(ToolOutput::Formatted { text, changed }),
            duration_ms: elapsed.as_millis() as u64,
            error_message: None,
            exit_code: Some(0),
        }
    }

    pub fn diagnostics(
        tool: ToolName,
        items: Vec<Diagnostic>,
        exit_code: Option<i32>,
        elapsed: Duration,
    ) -> Self {
        Self {
            tool,
            status: ExecutionStatus::Success,
            output: Some(ToolOutput::Diagnostics { items }),
            duration_ms: elapsed.as_millis() as u64,
            error_message: None,
            exit_code,
        }
    }

    pub fn failure(
        tool: ToolName,
        message: impl Into<String>,
        exit_code: Option<i32>,
        elapsed: Duration,
    ) -> Self {
        Self {
            tool,
            status: ExecutionStatus::Failure,
            output: None,
            duration_ms: elapsed.as_millis() as u64,
            error_message: Some(message.into()),
            exit_code,
        }
    }

    pub fn timed_out(tool: ToolName, limit: Duration, elapsed: Duration) -> Self {
        Self {
            tool,
            status: ExecutionStatus::TimedOut,
            output: None,
            duration_ms: elapsed.as_millis() as u64,
            error_message: Some(format!("timed out after {}ms", limit.as_millis())),
            exit_code: None,
        }
    }

    pub fn skipped(tool: ToolName, reason: impl Into<String>) -> Self {
        Self {
            tool,
            status: ExecutionStatus::Skipped,
            output: None,
            duration_ms: 0,
            error_message: Some(reason.into()),
            exit_code: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Success
    }

    /// Formatted text, for successful formatter results.
    pub fn formatted_text(&self) -> Option<&str> {
        match &self.output {
            Some(ToolOutput::Formatted { text, .. }) => Some(text),
            _ => None,
        }
    }

    pub fn changed(&self) -> bool {
        matches!(self.output, Some(ToolOutput::Formatted { changed: true, .. }))
    }
}

/// Ordered results for one pipeline invocation. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub kind: ToolKind,
    pub mode: SelectionMode,
    pub results: Vec<ExecutionResult>,
    /// Set when cooperative cancellation stopped the run early.
    pub cancelled: bool,
}

impl RunReport {
    pub fn new(kind: ToolKind, mode: SelectionMode, results: Vec<ExecutionResult>) -> Self {
        Self { kind, mode, results, cancelled: false }
    }

    /// Report for an empty plan or an unconfigured language.
    pub fn empty(kind: ToolKind, mode: SelectionMode) -> Self {
        Self::new(kind, mode, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// True when every attempted tool succeeded (vacuously true when empty).
    pub fn succeeded(&self) -> bool {
        self.results.iter().all(ExecutionResult::is_success)
    }

    pub fn all_skipped(&self) -> bool {
        !self.results.is_empty()
            && self.results.iter().all(|r| r.status == ExecutionStatus::Skipped)
    }

    pub fn statuses(&self) -> Vec<ExecutionStatus> {
        self.results.iter().map(|r| r.status).collect()
    }

    /// The first result that failed or timed out.
    pub fn first_failure(&self) -> Option<&ExecutionResult> {
        self.results
            .iter()
            .find(|r| matches!(r.status, ExecutionStatus::Failure | ExecutionStatus::TimedOut))
    }

    /// All diagnostics, in policy order.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.results.iter().flat_map(|r| match &r.output {
            Some(ToolOutput::Diagnostics { items }) => items.as_slice(),
            _ => &[],
        })
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.results.iter().map(|r| r.duration_ms).sum()
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
