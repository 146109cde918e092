// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tidy config` specs

use crate::prelude::*;

#[test]
fn check_reports_counts() {
    let project = Project::python();
    project
        .tidy()
        .args(&["config", "check"])
        .passes()
        .stdout_has(".tidy/config.toml")
        .stdout_has("ok: 3 tools, 1 languages");
}

#[test]
fn check_without_config_says_nothing_runs() {
    let project = Project::empty();
    project
        .tidy()
        .args(&["config", "check"])
        .passes()
        .stdout_has("no configuration found");
}

#[test]
fn invalid_reference_names_its_location() {
    let project = Project::empty();
    project.config("[language.python]\nformat = [\"black\"]\n");
    project
        .tidy()
        .args(&["config", "check"])
        .exits(2)
        .stderr_has("language.python.format");
}

#[test]
fn tidy_config_env_overrides_discovery() {
    let project = Project::python();
    let elsewhere = project.file("elsewhere.toml", "");
    let check = project
        .tidy()
        .env("TIDY_CONFIG", &elsewhere)
        .args(&["config", "check", "-o", "json"])
        .passes()
        .json();
    assert_eq!(check["tools"], 0);
    assert_eq!(check["sources"][0], elsewhere.display().to_string());
}

#[test]
fn show_lists_tools_and_languages() {
    let project = Project::python();
    project
        .tidy()
        .args(&["config", "show"])
        .passes()
        .stdout_has("isort")
        .stdout_has("python (py)");
}
