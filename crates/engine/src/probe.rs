// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Availability and applicability prober: (policy, project state) to plan.

use crate::cache::{AvailabilityCache, ConfigFileCache};
use crate::resolver::Resolved;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tidy_adapters::ExecutableLocator;
use tidy_config::{Config, EngineSettings};
use tidy_core::{
    ExecutionPlan, LanguagePolicy, PlannedTool, SelectionMode, ToolKind, ToolName, ToolSpec,
};

/// Filter a policy's candidates into plan entries.
///
/// `probe` returns the planned entry for a passing tool and `None` for a
/// tool that is unavailable or inapplicable. Under
/// [`SelectionMode::StopAtFirstAvailable`] probing stops at the first pass.
pub fn select(
    policy: &LanguagePolicy,
    mut probe: impl FnMut(&ToolName) -> Option<PlannedTool>,
) -> Vec<PlannedTool> {
    let mut entries = Vec::new();
    for name in policy.tools() {
        let Some(entry) = probe(name) else {
            continue;
        };
        entries.push(entry);
        if policy.mode() == SelectionMode::StopAtFirstAvailable {
            break;
        }
    }
    entries
}

/// Search for `name` from `start` upward to `root`, inclusive.
///
/// When `start` is outside `root` only `start` itself is searched. The
/// search never goes above `ceiling`.
pub fn find_upward(
    start: &Path,
    root: &Path,
    name: &str,
    ceiling: Option<&Path>,
    exists: impl Fn(&Path, &str) -> bool,
) -> Option<PathBuf> {
    if !start.starts_with(root) {
        return exists(start, name).then(|| start.join(name));
    }
    start
        .ancestors()
        .take_while(|dir| dir.starts_with(root))
        .take_while(|dir| within_ceiling(dir, start, ceiling))
        .find(|dir| exists(dir, name))
        .map(|dir| dir.join(name))
}

/// Nearest ancestor of `dir` holding any of `markers`, else `dir`.
pub fn find_project_root(dir: &Path, markers: &[String], ceiling: Option<&Path>) -> PathBuf {
    dir.ancestors()
        .take_while(|d| within_ceiling(d, dir, ceiling))
        .find(|d| markers.iter().any(|m| d.join(m).exists()))
        .unwrap_or(dir)
        .to_path_buf()
}

/// A ceiling only bounds searches that start beneath it.
fn within_ceiling(dir: &Path, start: &Path, ceiling: Option<&Path>) -> bool {
    match ceiling {
        Some(ceiling) if start.starts_with(ceiling) => dir.starts_with(ceiling),
        _ => true,
    }
}

#[derive(Debug, Clone)]
struct ProbeSettings {
    root_markers: Vec<String>,
    search_ceiling: Option<PathBuf>,
}

impl From<&EngineSettings> for ProbeSettings {
    fn from(settings: &EngineSettings) -> Self {
        Self {
            root_markers: settings.root_markers.clone(),
            search_ceiling: settings.search_ceiling.clone(),
        }
    }
}

/// Builds execution plans, caching executable lookups and config-file checks.
pub struct Prober<L> {
    locator: L,
    availability: AvailabilityCache,
    config_files: ConfigFileCache,
    settings: RwLock<ProbeSettings>,
}

impl<L: ExecutableLocator> Prober<L> {
    pub fn new(locator: L, settings: &EngineSettings) -> Self {
        Self {
            locator,
            availability: AvailabilityCache::new(),
            config_files: ConfigFileCache::new(),
            settings: RwLock::new(ProbeSettings::from(settings)),
        }
    }

    /// Project root for `file`, from the configured root markers.
    pub fn project_root(&self, file: &Path) -> PathBuf {
        let dir = file.parent().unwrap_or(file);
        let settings = self.settings.read();
        find_project_root(dir, &settings.root_markers, settings.search_ceiling.as_deref())
    }

    /// Plan the tools of a resolved policy for `file` in the project at `root`.
    pub fn plan(
        &self,
        config: &Config,
        resolved: &Resolved<'_>,
        kind: ToolKind,
        file: &Path,
        root: &Path,
    ) -> ExecutionPlan {
        let mut plan =
            ExecutionPlan::new(kind, resolved.policy.mode(), resolved.classifier, root);
        plan.entries = select(resolved.policy, |name| {
            let Some(spec) = config.tool(name.as_str()) else {
                tracing::warn!(tool = %name, "policy names an undefined tool");
                return None;
            };
            self.probe_tool(spec, file, root)
        });
        tracing::debug!(
            classifier = %plan.classifier,
            %kind,
            mode = %plan.mode,
            tools = ?plan.names(),
            "planned"
        );
        plan
    }

    fn probe_tool(&self, spec: &Arc<ToolSpec>, file: &Path, root: &Path) -> Option<PlannedTool> {
        let Some(executable) = self.available(&spec.invocation.command, root) else {
            tracing::debug!(tool = %spec.name, "unavailable");
            return None;
        };
        let config_file = match &spec.required_config {
            Some(name) => {
                let dir = file.parent().unwrap_or(file);
                let ceiling = self.settings.read().search_ceiling.clone();
                let found = find_upward(dir, root, name, ceiling.as_deref(), |d, n| {
                    self.config_files.exists(d, n)
                });
                let Some(found) = found else {
                    tracing::debug!(tool = %spec.name, required = %name, "inapplicable");
                    return None;
                };
                Some(found)
            }
            None => None,
        };
        Some(PlannedTool { spec: Arc::clone(spec), executable, config_file })
    }

    fn available(&self, command: &str, root: &Path) -> Option<PathBuf> {
        if let Some(cached) = self.availability.get(command, root) {
            return cached;
        }
        match self.locator.locate(command, root) {
            Ok(resolved) => {
                self.availability.insert(command, root, resolved.clone());
                resolved
            }
            Err(e) => {
                tracing::warn!(command, error = %e, "executable lookup failed");
                None
            }
        }
    }

    /// Drop every cached lookup and adopt new search settings.
    pub fn reload(&self, settings: &EngineSettings) {
        *self.settings.write() = ProbeSettings::from(settings);
        self.invalidate();
    }

    pub fn invalidate(&self) {
        self.availability.invalidate();
        self.config_files.invalidate();
    }

    pub fn availability(&self) -> &AvailabilityCache {
        &self.availability
    }

    pub fn config_files(&self) -> &ConfigFileCache {
        &self.config_files
    }
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
