// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for behavioral specs.

use assert_cmd::Command;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;

/// Python chain used by most specs: `isort` sorts lines, `black` spaces `=`.
///
/// Both fakes are idempotent, so formatting tidy content changes nothing.
pub const PYTHON_CONFIG: &str = r#"
[tool.isort]
kind = "formatter"
command = "isort"

[tool.black]
kind = "formatter"
command = "black"

[tool.flake]
kind = "linter"
command = "flake"
args = ["${file}"]

[language.python]
extensions = ["py"]
format = { tools = ["isort", "black"], mode = "run_all" }
lint = ["flake"]
"#;

/// `tidy` with no project; runs in a scratch directory.
pub fn cli() -> CliBuilder {
    let dir = TempDir::new().unwrap();
    let builder = CliBuilder::new(dir.path());
    CliBuilder { _scratch: Some(dir), ..builder }
}

/// A temporary project directory with its own `bin/` on PATH.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("bin")).unwrap();
        std::fs::create_dir_all(dir.path().join("xdg")).unwrap();
        Self { dir }
    }

    /// A git-rooted project with the python chain configured and installed.
    pub fn python() -> Self {
        let project = Self::empty();
        project.git_init();
        project.config(PYTHON_CONFIG);
        project.tool("isort", "sort");
        project.tool("black", "sed 's/ *= */ = /'");
        project.tool("flake", ":");
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn git_init(&self) {
        std::fs::create_dir_all(self.path().join(".git")).unwrap();
    }

    pub fn file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.path().join(rel)).unwrap()
    }

    /// Write the project config at `.tidy/config.toml`.
    pub fn config(&self, toml: &str) {
        self.file(".tidy/config.toml", toml);
    }

    /// Install an executable shell script at `bin/<name>`.
    pub fn tool(&self, name: &str, body: &str) {
        let path = self.file(&format!("bin/{name}"), &format!("#!/bin/sh\n{body}\n"));
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    pub fn tidy(&self) -> CliBuilder {
        CliBuilder::new(self.path())
    }
}

pub struct CliBuilder {
    cmd: Command,
    _scratch: Option<TempDir>,
}

impl CliBuilder {
    fn new(dir: &Path) -> Self {
        let mut cmd = Command::cargo_bin("tidy").unwrap();
        let path = format!("{}:/usr/bin:/bin", dir.join("bin").display());
        cmd.current_dir(dir)
            .env("PATH", path)
            .env("XDG_CONFIG_HOME", dir.join("xdg"))
            .env("NO_COLOR", "1")
            .env_remove("TIDY_CONFIG")
            .env_remove("TIDY_LOG")
            .env_remove("TIDY_LOG_FILE");
        Self { cmd, _scratch: None }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn stdin(mut self, input: &str) -> Self {
        self.cmd.write_stdin(input.to_string());
        self
    }

    fn output(mut self) -> Output {
        self.cmd.output().unwrap()
    }

    pub fn passes(self) -> RunAssert {
        self.exits(0)
    }

    pub fn exits(self, code: i32) -> RunAssert {
        let output = self.output();
        let run = RunAssert { output };
        similar_asserts::assert_eq!(
            run.output.status.code(),
            Some(code),
            "stdout:\n{}\nstderr:\n{}",
            run.stdout(),
            run.stderr()
        );
        run
    }
}

pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        let stdout = self.stdout();
        assert!(stdout.contains(needle), "stdout missing {needle:?}:\n{stdout}");
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        let stdout = self.stdout();
        assert!(!stdout.contains(needle), "stdout has {needle:?}:\n{stdout}");
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        let stderr = self.stderr();
        assert!(stderr.contains(needle), "stderr missing {needle:?}:\n{stderr}");
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.output.stdout).unwrap()
    }
}
