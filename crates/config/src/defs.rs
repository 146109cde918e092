// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Raw configuration definitions as they appear on disk.
//!
//! The same structs deserialize from TOML tables, HCL labeled blocks and
//! JSON objects:
//!
//! ```hcl
//! tool "black" {
//!   kind    = "formatter"
//!   command = "black"
//!   args    = ["--quiet", "-"]
//! }
//!
//! language "python" {
//!   extensions = ["py"]
//!   format     = { tools = ["isort", "black"], mode = "run_all" }
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tidy_core::{ConflictPolicy, OutputStream, RollbackPolicy, SelectionMode, ToolKind, WorkingDir};

/// One parsed config file, before validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub engine: Option<EngineDef>,
    #[serde(default, rename = "tool")]
    pub tools: IndexMap<String, ToolDef>,
    #[serde(default, rename = "language")]
    pub languages: IndexMap<String, LanguageDef>,
    /// Alternate classifier spellings, e.g. `py = "python"`
    #[serde(default)]
    pub aliases: IndexMap<String, String>,
}

impl ConfigFile {
    /// Layer `overlay` on top of `self`.
    ///
    /// Tools, languages and aliases from the overlay replace same-named
    /// entries; an overlay `engine` section replaces the base one wholesale.
    pub fn merge(mut self, overlay: ConfigFile) -> ConfigFile {
        if overlay.engine.is_some() {
            self.engine = overlay.engine;
        }
        merge_map(&mut self.tools, overlay.tools, "tool");
        merge_map(&mut self.languages, overlay.languages, "language");
        merge_map(&mut self.aliases, overlay.aliases, "alias");
        self
    }
}

fn merge_map<V>(target: &mut IndexMap<String, V>, source: IndexMap<String, V>, entity: &str) {
    for (name, value) in source {
        if target.insert(name.clone(), value).is_some() {
            tracing::debug!(entity, %name, "project config overrides global entry");
        }
    }
}

/// A tool definition.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ToolDef {
    pub kind: ToolKind,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub prepend_args: Vec<String>,
    #[serde(default)]
    pub append_args: Vec<String>,
    #[serde(default, alias = "required_config_file")]
    pub required_config: Option<String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub stdin: Option<bool>,
    #[serde(default)]
    pub exit_codes: Option<Vec<i32>>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default)]
    pub cwd: WorkingDir,
    #[serde(default)]
    pub stream: OutputStream,
    #[serde(default)]
    pub parser: Option<ParserDef>,
}

/// `parser = "json"` or `parser = { regex = "..." }`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ParserDef {
    Named(String),
    Regex { regex: String },
}

/// Rules for one language.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LanguageDef {
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub format: Option<PolicyDef>,
    #[serde(default)]
    pub lint: Option<PolicyDef>,
}

/// `format = ["a", "b"]` or `format = { tools = ["a"], mode = "stop_at_first" }`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PolicyDef {
    Tools(Vec<String>),
    Full {
        tools: Vec<String>,
        #[serde(default)]
        mode: SelectionMode,
    },
}

impl PolicyDef {
    pub fn tools(&self) -> &[String] {
        match self {
            PolicyDef::Tools(tools) | PolicyDef::Full { tools, .. } => tools,
        }
    }

    pub fn mode(&self) -> SelectionMode {
        match self {
            PolicyDef::Tools(_) => SelectionMode::default(),
            PolicyDef::Full { mode, .. } => *mode,
        }
    }
}

/// Scheduler and coordinator settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineDef {
    pub quiet_window_ms: u64,
    pub save_ceiling_ms: u64,
    pub aggregate_ceiling_ms: Option<u64>,
    pub rollback: RollbackPolicy,
    pub workers: usize,
    pub root_markers: Vec<String>,
    pub local_dirs: Vec<String>,
    pub use_path: bool,
    pub manager_dirs: Vec<String>,
    pub search_ceiling: Option<String>,
    pub conflict: ConflictDef,
    pub stages: StagesDef,
}

impl Default for EngineDef {
    fn default() -> Self {
        Self {
            quiet_window_ms: 300,
            save_ceiling_ms: 5_000,
            aggregate_ceiling_ms: None,
            rollback: RollbackPolicy::default(),
            workers: 4,
            root_markers: vec![".git".to_string()],
            local_dirs: vec!["node_modules/.bin".to_string(), ".venv/bin".to_string()],
            use_path: true,
            manager_dirs: Vec::new(),
            search_ceiling: None,
            conflict: ConflictDef::default(),
            stages: StagesDef::default(),
        }
    }
}

/// Conflict policy per trigger kind.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConflictDef {
    pub saved: ConflictPolicy,
    pub text_changed: ConflictPolicy,
    pub focus_entered: ConflictPolicy,
    pub insert_exited: ConflictPolicy,
}

impl Default for ConflictDef {
    fn default() -> Self {
        Self {
            saved: ConflictPolicy::Queue,
            text_changed: ConflictPolicy::Supersede,
            focus_entered: ConflictPolicy::Supersede,
            insert_exited: ConflictPolicy::Supersede,
        }
    }
}

/// Pipeline stages per trigger kind.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StagesDef {
    pub saved: Vec<StageDef>,
    pub text_changed: Vec<StageDef>,
    pub focus_entered: Vec<StageDef>,
    pub insert_exited: Vec<StageDef>,
}

impl Default for StagesDef {
    fn default() -> Self {
        Self {
            saved: vec![StageDef::Format, StageDef::Lint],
            text_changed: vec![StageDef::Lint],
            focus_entered: vec![StageDef::Lint],
            insert_exited: vec![StageDef::Lint],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageDef {
    Format,
    Lint,
}

impl From<StageDef> for ToolKind {
    fn from(stage: StageDef) -> Self {
        match stage {
            StageDef::Format => ToolKind::Formatter,
            StageDef::Lint => ToolKind::Linter,
        }
    }
}
