// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prober caches. Entries never expire; a configuration reload clears them.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Executable resolution per (command, project root).
#[derive(Debug, Default)]
pub struct AvailabilityCache {
    entries: RwLock<HashMap<(String, PathBuf), Option<PathBuf>>>,
}

impl AvailabilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Some(None)` is a cached miss.
    pub fn get(&self, command: &str, root: &Path) -> Option<Option<PathBuf>> {
        self.entries.read().get(&(command.to_string(), root.to_path_buf())).cloned()
    }

    pub fn insert(&self, command: &str, root: &Path, resolved: Option<PathBuf>) {
        self.entries.write().insert((command.to_string(), root.to_path_buf()), resolved);
    }

    pub fn invalidate(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// Presence of a file name in a directory.
#[derive(Debug, Default)]
pub struct ConfigFileCache {
    entries: RwLock<HashMap<(PathBuf, String), bool>>,
}

impl ConfigFileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `dir/name` exists, checking the filesystem on a miss.
    pub fn exists(&self, dir: &Path, name: &str) -> bool {
        let key = (dir.to_path_buf(), name.to_string());
        if let Some(hit) = self.entries.read().get(&key) {
            return *hit;
        }
        let present = dir.join(name).exists();
        self.entries.write().insert(key, present);
        present
    }

    pub fn invalidate(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
