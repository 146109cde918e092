// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Loads configuration and builds the real collaborators.

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tidy_adapters::{LocalProcessRunner, SearchPathLocator};
use tidy_config::{load_config, EngineSettings, LoadedConfig};
use tidy_engine::Pipeline;

/// Configuration for one CLI invocation.
pub struct Context {
    pub loaded: LoadedConfig,
    /// Directory relative paths are resolved against
    pub cwd: PathBuf,
}

impl Context {
    /// Load config from `--config`, else `TIDY_CONFIG`, else by discovery from `cwd`.
    pub fn load(explicit: Option<&Path>, cwd: PathBuf) -> Result<Self> {
        let explicit = explicit.map(Path::to_path_buf).or_else(crate::env::config_path);
        let loaded =
            load_config(explicit.as_deref(), &cwd).context("failed to load configuration")?;
        for source in &loaded.sources {
            tracing::debug!(source = %source.display(), "config source");
        }
        Ok(Self { loaded, cwd })
    }

    pub fn settings(&self) -> &EngineSettings {
        self.loaded.config.engine()
    }

    /// Absolute path for a command-line file argument.
    pub fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.cwd.join(file)
        }
    }

    pub fn pipeline(&self) -> Pipeline<LocalProcessRunner, SearchPathLocator> {
        Pipeline::new(
            self.loaded.config.clone(),
            LocalProcessRunner::new(),
            locator(self.settings()),
        )
    }
}

/// Executable search order: project-local dirs, then `PATH`, then tool managers.
pub fn locator(settings: &EngineSettings) -> SearchPathLocator {
    let path = if settings.use_path {
        SearchPathLocator::split_path(crate::env::search_path().as_deref())
    } else {
        Vec::new()
    };
    SearchPathLocator::new(settings.local_dirs.clone(), path, settings.manager_dirs.clone())
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
