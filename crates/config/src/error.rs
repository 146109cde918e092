// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration load errors. All of them are fatal at startup.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("HCL parse error: {0}")]
    Hcl(#[from] hcl::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported config format: {}", path.display())]
    UnknownFormat { path: PathBuf },
    #[error("{location}: references unknown tool '{tool}'")]
    UnknownTool { location: String, tool: String },
    #[error("{location}: '{tool}' is a {actual}, expected a {expected}")]
    KindMismatch { location: String, tool: String, expected: String, actual: String },
    #[error("invalid config at {location}: {message}")]
    InvalidFormat { location: String, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(location: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidFormat { location: location.into(), message: message.into() }
    }
}
