// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tidy-config: configuration loading, validation and argument templates

mod config;
mod defs;
mod error;
mod find;
mod parser;
mod settings;
pub mod template;

pub use config::{Config, FALLBACK_LANGUAGE};
pub use defs::{
    ConfigFile, ConflictDef, EngineDef, LanguageDef, ParserDef, PolicyDef, StageDef, StagesDef,
    ToolDef,
};
pub use error::ConfigError;
pub use find::{
    config_in, find_project_config, global_config, load_config, load_config_layered,
    LoadedConfig, PROJECT_DIR,
};
pub use parser::{
    format_for_path, parse_config, parse_config_with_format, parse_file_with_format, read_file,
    Format,
};
pub use settings::EngineSettings;
pub use template::{interpolate, TemplateVars};
