// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tidy plan` specs

use crate::prelude::*;

#[test]
fn plan_lists_both_stages_in_order() {
    let project = Project::python();
    project.file("app.py", "");
    project
        .tidy()
        .args(&["plan", "app.py"])
        .passes()
        .stdout_has("formatter python (run_all_in_order")
        .stdout_has("  isort")
        .stdout_has("  black")
        .stdout_has("linter python (run_all_in_order")
        .stdout_has("  flake");
}

#[test]
fn plan_stage_filter() {
    let project = Project::python();
    project.tidy().args(&["plan", "app.py", "--stage", "lint"]).passes().stdout_lacks("isort");
}

#[test]
fn plan_skips_uninstalled_tools() {
    let project = Project::python();
    std::fs::remove_file(project.path().join("bin/black")).unwrap();
    project
        .tidy()
        .args(&["plan", "app.py", "--stage", "format"])
        .passes()
        .stdout_has("isort")
        .stdout_lacks("black");
}

#[test]
fn plan_for_unknown_language_is_empty() {
    let project = Project::python();
    project.tidy().args(&["plan", "notes.txt"]).passes().stdout_has("no applicable tools");
}

#[test]
fn plan_language_flag_overrides_extension() {
    let project = Project::python();
    project
        .tidy()
        .args(&["plan", "script", "--language", "python", "--stage", "format"])
        .passes()
        .stdout_has("isort");
}

#[test]
fn plan_gates_tools_on_required_config() {
    let project = Project::python();
    project.config(&PYTHON_CONFIG.replace(
        "command = \"black\"",
        "command = \"black\"\nrequired_config = \"pyproject.toml\"",
    ));
    project.file("src/app.py", "");
    let args = ["plan", "src/app.py", "--stage", "format"];
    project.tidy().args(&args).passes().stdout_lacks("black");

    project.file("pyproject.toml", "");
    project.tidy().args(&args).passes().stdout_has("black").stdout_has("pyproject.toml]");
}

#[test]
fn plan_json_output() {
    let project = Project::python();
    let plans = project.tidy().args(&["-o", "json", "plan", "app.py"]).passes().json();
    let plans = plans.as_array().unwrap();
    assert_eq!(plans.len(), 2);
    assert_eq!(plans[0]["kind"], "formatter");
    assert_eq!(plans[0]["classifier"], "python");
    assert_eq!(plans[0]["entries"].as_array().unwrap().len(), 2);
    assert_eq!(plans[1]["kind"], "linter");
}
