// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External tool definitions.
//!
//! A [`ToolSpec`] describes one formatter or linter binary and how to invoke
//! it. Specs are built once at configuration load and shared behind `Arc`
//! for the lifetime of the process.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Per-invocation timeout applied when a tool does not set one.
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Unique name of a tool in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolName(SmolStr);

impl ToolName {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ToolName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ToolName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl PartialEq<&str> for ToolName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::borrow::Borrow<str> for ToolName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Whether a tool rewrites content or reports diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    Formatter,
    Linter,
}

crate::simple_display! {
    ToolKind {
        Formatter => "formatter",
        Linter => "linter",
    }
}

/// Command template: executable plus argument list.
///
/// Arguments may contain `${file}`, `${dir}`, `${root}`, `${relative}` and
/// `${language}` placeholders, interpolated per target file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(
        command: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self { command: command.into(), args: args.into_iter().map(Into::into).collect() }
    }

    /// True when the command names a path rather than a bare executable name.
    pub fn is_path(&self) -> bool {
        self.command.contains('/') || self.command.contains(std::path::MAIN_SEPARATOR)
    }
}

/// Which output stream a linter's diagnostics are read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputStream {
    #[default]
    Stdout,
    Stderr,
    Both,
}

/// Working directory for a tool process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkingDir {
    /// The project root
    #[default]
    Root,
    /// The target file's directory
    FileDir,
}

/// How a linter's output is turned into diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticFormat {
    /// One diagnostic per non-empty line, `path:line:col: message` when it matches
    #[default]
    Lines,
    /// Regex with named groups `line`, `col`, `severity`, `message`, `code`
    Regex { pattern: String },
    /// JSON array of diagnostic objects
    Json,
}

/// One external tool usable as a formatter or linter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolSpec {
    pub name: ToolName,
    pub kind: ToolKind,
    pub invocation: Invocation,
    pub prepend_args: Vec<String>,
    pub append_args: Vec<String>,
    /// Marker file that must exist between the file's directory and the
    /// project root for the tool to apply.
    pub required_config: Option<String>,
    pub timeout_ms: u64,
    /// Pipe the buffer content to stdin. When false, formatters receive the
    /// content through a temporary file substituted for `${input}`.
    pub stdin: bool,
    pub exit_codes: Vec<i32>,
    pub env: BTreeMap<String, String>,
    pub cwd: WorkingDir,
    pub stream: OutputStream,
    pub parser: DiagnosticFormat,
}

impl ToolSpec {
    /// Create a spec with kind-appropriate defaults.
    pub fn new(name: impl Into<ToolName>, kind: ToolKind, invocation: Invocation) -> Self {
        let (stdin, exit_codes) = match kind {
            ToolKind::Formatter => (true, vec![0]),
            ToolKind::Linter => (false, vec![0, 1]),
        };
        Self {
            name: name.into(),
            kind,
            invocation,
            prepend_args: Vec::new(),
            append_args: Vec::new(),
            required_config: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            stdin,
            exit_codes,
            env: BTreeMap::new(),
            cwd: WorkingDir::default(),
            stream: OutputStream::default(),
            parser: DiagnosticFormat::default(),
        }
    }

    pub fn formatter(name: impl Into<ToolName>, invocation: Invocation) -> Self {
        Self::new(name, ToolKind::Formatter, invocation)
    }

    pub fn linter(name: impl Into<ToolName>, invocation: Invocation) -> Self {
        Self::new(name, ToolKind::Linter, invocation)
    }

    crate::setters! {
        set {
            prepend_args: Vec<String>,
            append_args: Vec<String>,
            timeout_ms: u64,
            stdin: bool,
            exit_codes: Vec<i32>,
            env: BTreeMap<String, String>,
            cwd: WorkingDir,
            stream: OutputStream,
            parser: DiagnosticFormat,
        }
        option {
            required_config: String,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Full argument template: prepend args, template args, append args.
    pub fn arg_template(&self) -> Vec<String> {
        self.prepend_args
            .iter()
            .chain(&self.invocation.args)
            .chain(&self.append_args)
            .cloned()
            .collect()
    }

    pub fn accepts_exit(&self, code: i32) -> bool {
        self.exit_codes.contains(&code)
    }
}

#[cfg(test)]
#[path = "tool_tests.rs"]
mod tests;
