// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tidy format` chain specs

use crate::prelude::*;

const MESSY: &str = "b=2\na=1\n";
const TIDY: &str = "a = 1\nb = 2\n";

#[test]
fn format_prints_chained_output_and_leaves_file() {
    let project = Project::python();
    project.file("app.py", MESSY);
    project.tidy().args(&["format", "app.py"]).passes().stdout_eq(TIDY);
    assert_eq!(project.read("app.py"), MESSY);
}

#[test]
fn format_write_rewrites_file() {
    let project = Project::python();
    project.file("app.py", MESSY);
    project.tidy().args(&["format", "--write", "app.py"]).passes().stderr_has("formatted app.py");
    assert_eq!(project.read("app.py"), TIDY);
}

#[test]
fn format_check_reports_without_writing() {
    let project = Project::python();
    project.file("app.py", MESSY);
    project
        .tidy()
        .args(&["format", "--check", "app.py"])
        .exits(1)
        .stderr_has("would reformat app.py");
    assert_eq!(project.read("app.py"), MESSY);

    project.file("app.py", TIDY);
    project.tidy().args(&["format", "--check", "app.py"]).passes();
}

#[test]
fn formatting_twice_changes_nothing() {
    let project = Project::python();
    project.file("app.py", MESSY);
    project.tidy().args(&["format", "--write", "app.py"]).passes();
    project.tidy().args(&["format", "--check", "app.py"]).passes();
    project.tidy().args(&["format", "app.py"]).passes().stdout_eq(TIDY);
    assert_eq!(project.read("app.py"), TIDY);
}

#[test]
fn format_reads_stdin() {
    let project = Project::python();
    project
        .tidy()
        .args(&["format", "-", "--stdin-filename", "app.py"])
        .stdin(MESSY)
        .passes()
        .stdout_eq(TIDY);
}

#[test]
fn format_unknown_language_passes_content_through() {
    let project = Project::python();
    project.file("notes.txt", MESSY);
    project.tidy().args(&["format", "notes.txt"]).passes().stdout_eq(MESSY);
}

#[test]
fn format_require_tools_fails_without_formatter() {
    let project = Project::python();
    project.file("notes.txt", MESSY);
    project
        .tidy()
        .args(&["format", "--require-tools", "notes.txt"])
        .exits(2)
        .stderr_has("notes.txt");
}

#[test]
fn format_json_output() {
    let project = Project::python();
    project.file("app.py", MESSY);
    let results = project.tidy().args(&["-o", "json", "format", "app.py"]).passes().json();
    assert_eq!(results[0]["file"], "app.py");
    assert_eq!(results[0]["changed"], true);
    assert_eq!(results[0]["written"], false);
    let statuses: Vec<_> = results[0]["report"]["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["status"].clone())
        .collect();
    assert_eq!(statuses, ["success", "success"]);
}
