// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executable resolution: project-local dirs, then `PATH`, then tool-manager dirs.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("invalid search directory: {0}")]
    SearchPath(#[from] std::env::JoinPathsError),
    #[error("cannot resolve {command}: {source}")]
    Lookup {
        command: String,
        #[source]
        source: which::Error,
    },
}

/// Adapter for finding tool executables
pub trait ExecutableLocator: Clone + Send + Sync + 'static {
    /// Resolve `command` for the project at `project_root`.
    ///
    /// `Ok(None)` means the tool is not installed.
    fn locate(&self, command: &str, project_root: &Path) -> Result<Option<PathBuf>, LocateError>;
}

/// Searches a fixed, ordered list of directories.
#[derive(Debug, Clone, Default)]
pub struct SearchPathLocator {
    inner: Arc<SearchDirs>,
}

#[derive(Debug, Default)]
struct SearchDirs {
    /// Relative to the project root
    local: Vec<PathBuf>,
    path: Vec<PathBuf>,
    manager: Vec<PathBuf>,
}

impl SearchPathLocator {
    pub fn new(local: Vec<PathBuf>, path: Vec<PathBuf>, manager: Vec<PathBuf>) -> Self {
        Self { inner: Arc::new(SearchDirs { local, path, manager }) }
    }

    /// Directories listed in a `PATH`-style value.
    pub fn split_path(value: Option<&std::ffi::OsStr>) -> Vec<PathBuf> {
        value.map(|v| std::env::split_paths(v).collect()).unwrap_or_default()
    }

    /// The full search list for a project, as a `PATH`-style value.
    fn search_path(&self, root: &Path) -> Result<OsString, LocateError> {
        let dirs = &self.inner;
        let ordered = dirs
            .local
            .iter()
            .map(|d| root.join(d))
            .chain(dirs.path.iter().cloned())
            .chain(dirs.manager.iter().cloned());
        Ok(std::env::join_paths(ordered)?)
    }
}

impl ExecutableLocator for SearchPathLocator {
    fn locate(&self, command: &str, project_root: &Path) -> Result<Option<PathBuf>, LocateError> {
        if command.is_empty() {
            return Ok(None);
        }
        // Commands with a separator resolve against the root, never the search list
        let paths = self.search_path(project_root)?;
        match which::which_in(command, Some(paths), project_root) {
            Ok(path) => {
                tracing::trace!(command, path = %path.display(), "resolved executable");
                Ok(Some(path))
            }
            Err(which::Error::CannotFindBinaryPath) => Ok(None),
            Err(source) => Err(LocateError::Lookup { command: command.to_string(), source }),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{ExecutableLocator, LocateError};
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeLocatorState {
        installed: HashMap<String, PathBuf>,
        lookups: Vec<(String, PathBuf)>,
    }

    /// Fake locator with an explicit set of installed commands
    #[derive(Clone, Default)]
    pub struct FakeLocator {
        inner: Arc<Mutex<FakeLocatorState>>,
    }

    impl FakeLocator {
        pub fn new() -> Self {
            Self::default()
        }

        /// Locator where every named command resolves to `/fake/bin/<name>`.
        pub fn with(commands: &[&str]) -> Self {
            let locator = Self::new();
            for command in commands {
                locator.install(command);
            }
            locator
        }

        pub fn install(&self, command: &str) {
            let path = PathBuf::from("/fake/bin").join(command);
            self.inner.lock().installed.insert(command.to_string(), path);
        }

        pub fn uninstall(&self, command: &str) {
            self.inner.lock().installed.remove(command);
        }

        /// Number of `locate` calls made for `command`
        pub fn lookups(&self, command: &str) -> usize {
            self.inner.lock().lookups.iter().filter(|(c, _)| c == command).count()
        }
    }

    impl ExecutableLocator for FakeLocator {
        fn locate(
            &self,
            command: &str,
            project_root: &Path,
        ) -> Result<Option<PathBuf>, LocateError> {
            let mut state = self.inner.lock();
            state.lookups.push((command.to_string(), project_root.to_path_buf()));
            Ok(state.installed.get(command).cloned())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeLocator;

#[cfg(test)]
#[path = "locate_tests.rs"]
mod tests;
