// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validated engine settings.

use crate::defs::{EngineDef, StageDef};
use crate::error::ConfigError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tidy_core::{ConflictPolicy, RollbackPolicy, ToolKind, TriggerKind};

/// Scheduler, prober and coordinator settings derived from `[engine]`.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Debounce window for `TextChanged` bursts
    pub quiet_window: Duration,
    /// Upper bound a synchronous save waits for its outcome
    pub save_ceiling: Duration,
    /// Optional wall-clock cap on a whole coordinator run
    pub aggregate_ceiling: Option<Duration>,
    pub rollback: RollbackPolicy,
    /// Worker pool size (parallel runs across distinct files)
    pub workers: usize,
    /// Marker files or directories identifying a project root
    pub root_markers: Vec<String>,
    /// Project-relative directories searched before `PATH`
    pub local_dirs: Vec<PathBuf>,
    pub use_path: bool,
    /// Tool-manager install directories searched after `PATH`
    pub manager_dirs: Vec<PathBuf>,
    /// Directory above which no upward search may go
    pub search_ceiling: Option<PathBuf>,
    conflict: [ConflictPolicy; 4],
    stages: [Vec<ToolKind>; 4],
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::build(&EngineDef::default())
    }
}

impl EngineSettings {
    pub fn from_def(def: &EngineDef) -> Result<Self, ConfigError> {
        validate(def)?;
        Ok(Self::build(def))
    }

    fn build(def: &EngineDef) -> Self {
        Self {
            quiet_window: Duration::from_millis(def.quiet_window_ms),
            save_ceiling: Duration::from_millis(def.save_ceiling_ms),
            aggregate_ceiling: def.aggregate_ceiling_ms.map(Duration::from_millis),
            rollback: def.rollback,
            workers: def.workers,
            root_markers: def.root_markers.clone(),
            local_dirs: def.local_dirs.iter().map(PathBuf::from).collect(),
            use_path: def.use_path,
            manager_dirs: def.manager_dirs.iter().map(|d| expand_home(d)).collect(),
            search_ceiling: def.search_ceiling.as_deref().map(expand_home),
            conflict: [
                def.conflict.saved,
                def.conflict.text_changed,
                def.conflict.focus_entered,
                def.conflict.insert_exited,
            ],
            stages: [
                kinds(&def.stages.saved),
                kinds(&def.stages.text_changed),
                kinds(&def.stages.focus_entered),
                kinds(&def.stages.insert_exited),
            ],
        }
    }

    /// What a trigger of this kind does when its file already has a run in flight.
    pub fn conflict(&self, kind: TriggerKind) -> ConflictPolicy {
        self.conflict[slot(kind)]
    }

    /// Stages a trigger of this kind runs, in order.
    pub fn stages(&self, kind: TriggerKind) -> &[ToolKind] {
        &self.stages[slot(kind)]
    }

    pub fn with_conflict(mut self, kind: TriggerKind, policy: ConflictPolicy) -> Self {
        self.conflict[slot(kind)] = policy;
        self
    }

    pub fn with_stages(mut self, kind: TriggerKind, stages: Vec<ToolKind>) -> Self {
        self.stages[slot(kind)] = stages;
        self
    }
}

fn validate(def: &EngineDef) -> Result<(), ConfigError> {
    if def.workers == 0 {
        return Err(ConfigError::invalid("engine.workers", "must be at least 1"));
    }
    if def.save_ceiling_ms == 0 {
        return Err(ConfigError::invalid("engine.save_ceiling_ms", "must be greater than 0"));
    }
    if def.aggregate_ceiling_ms == Some(0) {
        return Err(ConfigError::invalid("engine.aggregate_ceiling_ms", "must be greater than 0"));
    }
    let lists = [
        ("saved", &def.stages.saved),
        ("text_changed", &def.stages.text_changed),
        ("focus_entered", &def.stages.focus_entered),
        ("insert_exited", &def.stages.insert_exited),
    ];
    for (field, list) in lists {
        for (i, stage) in list.iter().enumerate() {
            if list[..i].contains(stage) {
                return Err(ConfigError::invalid(
                    format!("engine.stages.{field}"),
                    format!("stage '{}' listed twice", ToolKind::from(*stage)),
                ));
            }
        }
    }
    Ok(())
}

fn kinds(list: &[StageDef]) -> Vec<ToolKind> {
    list.iter().map(|stage| ToolKind::from(*stage)).collect()
}

fn slot(kind: TriggerKind) -> usize {
    match kind {
        TriggerKind::Saved => 0,
        TriggerKind::TextChanged => 1,
        TriggerKind::FocusEntered => 2,
        TriggerKind::InsertExited => 3,
    }
}

/// Expand a leading `~/` to the user's home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    Path::new(path).to_path_buf()
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
