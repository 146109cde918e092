// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tidy format` failure specs

use crate::prelude::*;

#[test]
fn failing_formatter_exits_2_and_writes_nothing() {
    let project = Project::python();
    project.tool("black", "echo boom >&2\nexit 3");
    project.file("app.py", "b=2\na=1\n");
    project
        .tidy()
        .args(&["format", "--write", "app.py"])
        .exits(2)
        .stderr_has("exited with code 3: boom");
    assert_eq!(project.read("app.py"), "b=2\na=1\n");
}

#[test]
fn slow_formatter_times_out() {
    let project = Project::python();
    project.config(&PYTHON_CONFIG.replace(
        "command = \"black\"",
        "command = \"black\"\ntimeout_ms = 200",
    ));
    project.tool("black", "exec sleep 5");
    project.file("app.py", "a=1\n");
    project.tidy().args(&["format", "app.py"]).exits(2).stderr_has("timed out after 200ms");
}

#[test]
fn formatter_emitting_nothing_is_a_failure() {
    let project = Project::python();
    project.tool("black", "cat >/dev/null");
    project.file("app.py", "a=1\n");
    project.tidy().args(&["format", "--write", "app.py"]).exits(2);
    assert_eq!(project.read("app.py"), "a=1\n");
}

#[test]
fn missing_file_is_an_error() {
    let project = Project::python();
    project.tidy().args(&["format", "absent.py"]).exits(2).stderr_has("absent.py");
}
