// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution plans: the tools selected for one (file, project) pair.

use crate::policy::SelectionMode;
use crate::tool::{ToolKind, ToolName, ToolSpec};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// A tool that passed both availability and applicability checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedTool {
    pub spec: Arc<ToolSpec>,
    /// Resolved executable
    pub executable: PathBuf,
    /// The required config file that made the tool applicable, if any
    pub config_file: Option<PathBuf>,
}

impl PlannedTool {
    pub fn name(&self) -> &ToolName {
        &self.spec.name
    }
}

/// Filtered, ordered tools for one invocation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionPlan {
    pub kind: ToolKind,
    pub mode: SelectionMode,
    pub classifier: String,
    pub project_root: PathBuf,
    pub entries: Vec<PlannedTool>,
}

impl ExecutionPlan {
    pub fn new(
        kind: ToolKind,
        mode: SelectionMode,
        classifier: impl Into<String>,
        project_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            kind,
            mode,
            classifier: classifier.into(),
            project_root: project_root.into(),
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.spec.name.as_str()).collect()
    }
}
