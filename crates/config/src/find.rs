// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config file discovery and layering

use crate::config::Config;
use crate::defs::ConfigFile;
use crate::error::ConfigError;
use crate::parser::{read_file, Format};
use std::path::{Path, PathBuf};

/// Directory holding a project's config file.
pub const PROJECT_DIR: &str = ".tidy";

/// A loaded configuration and the files it was assembled from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    /// Sources in merge order: global first, project last.
    pub sources: Vec<PathBuf>,
}

/// `config.{toml,hcl,json}` inside `dir`, checked in that order.
pub fn config_in(dir: &Path) -> Option<PathBuf> {
    Format::ALL
        .iter()
        .map(|format| dir.join(format!("config.{}", format.extension())))
        .find(|path| path.is_file())
}

/// Nearest `.tidy/config.*` walking upward from `start`.
pub fn find_project_config(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| config_in(&dir.join(PROJECT_DIR)))
}

/// Global config under the user's config directory (`$XDG_CONFIG_HOME/tidy`).
pub fn global_config() -> Option<PathBuf> {
    config_in(&dirs::config_dir()?.join("tidy"))
}

/// Load the effective configuration.
///
/// An explicit path (from `TIDY_CONFIG` or `--config`) is used alone.
/// Otherwise the project config found from `start` is layered over the global
/// config; with neither present the configuration is empty.
pub fn load_config(explicit: Option<&Path>, start: &Path) -> Result<LoadedConfig, ConfigError> {
    load_config_layered(explicit, start, global_config().as_deref())
}

/// [`load_config`] with the global config location supplied by the caller.
pub fn load_config_layered(
    explicit: Option<&Path>,
    start: &Path,
    global: Option<&Path>,
) -> Result<LoadedConfig, ConfigError> {
    let sources: Vec<PathBuf> = match explicit {
        Some(path) => vec![path.to_path_buf()],
        None => global
            .map(Path::to_path_buf)
            .into_iter()
            .chain(find_project_config(start))
            .collect(),
    };

    let mut merged = ConfigFile::default();
    for path in &sources {
        merged = merged.merge(read_file(path)?);
    }
    if sources.is_empty() {
        tracing::debug!(start = %start.display(), "no config file found");
    }
    let config = Config::from_file(merged)?;
    Ok(LoadedConfig { config, sources })
}

#[cfg(test)]
#[path = "find_tests.rs"]
mod tests;
