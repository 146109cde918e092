// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config parsing for TOML, HCL and JSON sources.

use crate::config::Config;
use crate::defs::ConfigFile;
use crate::error::ConfigError;
use std::path::Path;

/// On-disk config format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Hcl,
    Json,
}

tidy_core::simple_display! {
    Format {
        Toml => "toml",
        Hcl => "hcl",
        Json => "json",
    }
}

impl Format {
    /// File extensions probed during discovery, in preference order.
    pub const ALL: [Format; 3] = [Format::Toml, Format::Hcl, Format::Json];

    pub fn extension(self) -> &'static str {
        match self {
            Format::Toml => "toml",
            Format::Hcl => "hcl",
            Format::Json => "json",
        }
    }
}

/// Format implied by a file's extension.
pub fn format_for_path(path: &Path) -> Option<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => Some(Format::Toml),
        Some("hcl") => Some(Format::Hcl),
        Some("json") => Some(Format::Json),
        _ => None,
    }
}

/// Parse raw content into an unvalidated [`ConfigFile`].
pub fn parse_file_with_format(content: &str, format: Format) -> Result<ConfigFile, ConfigError> {
    let file = match format {
        Format::Toml => toml::from_str(content)?,
        Format::Hcl => hcl::from_str(content)?,
        Format::Json => serde_json::from_str(content)?,
    };
    Ok(file)
}

/// Parse and validate a single config source.
pub fn parse_config_with_format(content: &str, format: Format) -> Result<Config, ConfigError> {
    Config::from_file(parse_file_with_format(content, format)?)
}

/// Parse a TOML config.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    parse_config_with_format(content, Format::Toml)
}

/// Read and parse a config file, picking the format from its extension.
pub fn read_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let format =
        format_for_path(path).ok_or_else(|| ConfigError::UnknownFormat { path: path.into() })?;
    let content = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.into(), source })?;
    tracing::debug!(path = %path.display(), %format, "parsing config");
    parse_file_with_format(&content, format)
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
