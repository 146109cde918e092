// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Editing events that drive the trigger scheduler.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Identifies a file buffer by path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(PathBuf);

impl FileId {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<&str> for FileId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for FileId {
    fn from(p: PathBuf) -> Self {
        Self(p)
    }
}

impl From<&Path> for FileId {
    fn from(p: &Path) -> Self {
        Self(p.to_path_buf())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    Saved,
    TextChanged,
    FocusEntered,
    InsertExited,
}

crate::simple_display! {
    TriggerKind {
        Saved => "saved",
        TextChanged => "text_changed",
        FocusEntered => "focus_entered",
        InsertExited => "insert_exited",
    }
}

impl TriggerKind {
    pub const ALL: [TriggerKind; 4] = [
        TriggerKind::Saved,
        TriggerKind::TextChanged,
        TriggerKind::FocusEntered,
        TriggerKind::InsertExited,
    ];

    /// Whether bursts of this trigger are collapsed by the quiet window.
    pub fn is_debounced(self) -> bool {
        matches!(self, TriggerKind::TextChanged)
    }
}

/// One editing event. Consumed by the scheduler and then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerEvent {
    pub kind: TriggerKind,
    pub file: FileId,
    /// Epoch milliseconds when the editor observed the event
    pub at_ms: u64,
}

impl TriggerEvent {
    pub fn new(kind: TriggerKind, file: impl Into<FileId>, at_ms: u64) -> Self {
        Self { kind, file: file.into(), at_ms }
    }

    pub fn saved(file: impl Into<FileId>, at_ms: u64) -> Self {
        Self::new(TriggerKind::Saved, file, at_ms)
    }

    pub fn text_changed(file: impl Into<FileId>, at_ms: u64) -> Self {
        Self::new(TriggerKind::TextChanged, file, at_ms)
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
