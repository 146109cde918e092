// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

use std::ffi::OsString;
use std::path::PathBuf;

/// Version string shown by `tidy --version`
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("TIDY_BUILD_HASH"));

/// Explicit config file: `TIDY_CONFIG`. Used alone, without layering.
pub fn config_path() -> Option<PathBuf> {
    std::env::var_os("TIDY_CONFIG").filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Log filter directives from `TIDY_LOG` (default `warn`)
pub fn log_filter() -> String {
    std::env::var("TIDY_LOG").ok().filter(|s| !s.trim().is_empty()).unwrap_or_else(|| "warn".into())
}

/// Log file from `TIDY_LOG_FILE`; logs go to stderr when unset
pub fn log_file() -> Option<PathBuf> {
    std::env::var_os("TIDY_LOG_FILE").filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Raw `PATH`, searched between project-local and tool-manager directories
pub fn search_path() -> Option<OsString> {
    std::env::var_os("PATH")
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
