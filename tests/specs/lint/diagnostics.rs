// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tidy lint` specs

use crate::prelude::*;

const FLAKE: &str = "echo \"$1:2:5: error: E1 bad thing\"\nexit 1";

#[test]
fn clean_lint_passes_silently() {
    let project = Project::python();
    project.file("app.py", "a = 1\n");
    project.tidy().args(&["lint", "app.py"]).passes().stdout_eq("");
}

#[test]
fn diagnostics_are_printed_and_exit_1() {
    let project = Project::python();
    project.tool("flake", FLAKE);
    project.file("app.py", "a = 1\n");
    project
        .tidy()
        .args(&["lint", "app.py"])
        .exits(1)
        .stdout_has("app.py:2:5: error: [E1] bad thing (flake)");
}

#[test]
fn stop_at_first_skips_uninstalled_linters() {
    let project = Project::python();
    project.config(&PYTHON_CONFIG.replace(
        "lint = [\"flake\"]",
        concat!(
            "lint = { tools = [\"pylint\", \"flake\"], mode = \"stop_at_first\" }\n\n",
            "[tool.pylint]\nkind = \"linter\"\ncommand = \"pylint\"",
        ),
    ));
    project.tool("flake", FLAKE);
    project.file("app.py", "a = 1\n");
    project.tidy().args(&["lint", "app.py"]).exits(1).stdout_has("(flake)");
}

#[test]
fn unexpected_linter_exit_is_a_failure() {
    let project = Project::python();
    project.tool("flake", "echo crashed >&2\nexit 4");
    project.file("app.py", "a = 1\n");
    project.tidy().args(&["lint", "app.py"]).exits(2).stderr_has("exited with code 4: crashed");
}

#[test]
fn lint_json_output() {
    let project = Project::python();
    project.tool("flake", FLAKE);
    project.file("app.py", "a = 1\n");
    let reports = project.tidy().args(&["-o", "json", "lint", "app.py"]).exits(1).json();
    let diagnostic = &reports[0]["report"]["results"][0]["output"]["items"][0];
    assert_eq!(diagnostic["line"], 2);
    assert_eq!(diagnostic["column"], 5);
    assert_eq!(diagnostic["code"], "E1");
    assert_eq!(diagnostic["severity"], "error");
}
