// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-language tool selection and execution policies.

use crate::tool::{ToolKind, ToolName};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a policy's ordered candidates become a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Waterfall: the first available and applicable tool wins.
    #[serde(alias = "stop_at_first", alias = "first")]
    StopAtFirstAvailable,
    /// Every available and applicable tool, in policy order.
    #[default]
    #[serde(alias = "run_all", alias = "all")]
    RunAllInOrder,
}

crate::simple_display! {
    SelectionMode {
        StopAtFirstAvailable => "stop_at_first_available",
        RunAllInOrder => "run_all_in_order",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("policy must name at least one tool")]
    Empty,
}

/// Ordered, non-empty tool list for one language and tool kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguagePolicy {
    tools: Vec<ToolName>,
    mode: SelectionMode,
}

impl LanguagePolicy {
    pub fn new(tools: Vec<ToolName>, mode: SelectionMode) -> Result<Self, PolicyError> {
        if tools.is_empty() {
            return Err(PolicyError::Empty);
        }
        Ok(Self { tools, mode })
    }

    pub fn tools(&self) -> &[ToolName] {
        &self.tools
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }
}

/// Rules configured for one language classifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LanguageRules {
    pub format: Option<LanguagePolicy>,
    pub lint: Option<LanguagePolicy>,
    /// File extensions (without the dot) classified as this language.
    pub extensions: Vec<String>,
}

impl LanguageRules {
    pub fn policy(&self, kind: ToolKind) -> Option<&LanguagePolicy> {
        match kind {
            ToolKind::Formatter => self.format.as_ref(),
            ToolKind::Linter => self.lint.as_ref(),
        }
    }
}

/// What happens to content when a step in a formatter chain fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollbackPolicy {
    /// Revert to the original content.
    #[default]
    Atomic,
    /// Keep the output of the last successful step.
    KeepPartial,
}

/// What a new trigger does when its file already has a run in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Wait for the in-flight run, then run.
    Queue,
    /// Cancel the in-flight run and run with the latest content.
    Supersede,
}

crate::simple_display! {
    ConflictPolicy {
        Queue => "queue",
        Supersede => "supersede",
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
