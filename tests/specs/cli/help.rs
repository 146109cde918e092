// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs

use crate::prelude::*;

#[test]
fn tidy_help_shows_usage() {
    cli().args(&["--help"]).passes().stdout_has("Usage:").stdout_has("format");
}

#[test]
fn tidy_version_names_the_binary() {
    cli().args(&["--version"]).passes().stdout_has("tidy");
}

#[test]
fn tidy_format_help_shows_flags() {
    cli()
        .args(&["format", "--help"])
        .passes()
        .stdout_has("--write")
        .stdout_has("--check")
        .stdout_has("--stdin-filename");
}

#[test]
fn tidy_config_help_shows_subcommands() {
    cli().args(&["config", "--help"]).passes().stdout_has("check").stdout_has("show");
}

#[test]
fn tidy_write_and_check_conflict() {
    cli().args(&["format", "--write", "--check", "a.py"]).exits(2).stderr_has("cannot be used");
}
