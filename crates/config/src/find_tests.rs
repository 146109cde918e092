// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::fs;
use tempfile::TempDir;

const GLOBAL: &str = r#"
[tool.black]
kind = "formatter"
command = "black"
timeout_ms = 1000

[tool.ruff]
kind = "linter"
command = "ruff"

[language.python]
extensions = ["py"]
lint = ["ruff"]
"#;

const PROJECT: &str = r#"
[tool.black]
kind = "formatter"
command = "black"
timeout_ms = 3000

[language.python]
extensions = ["py"]
format = ["black"]
"#;

fn write(dir: &Path, rel: &str, content: &str) -> PathBuf {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn finds_nearest_project_config_upward() {
    let tmp = TempDir::new().unwrap();
    let outer = write(tmp.path(), ".tidy/config.toml", "");
    let inner = write(tmp.path(), "pkg/.tidy/config.hcl", "");
    let deep = tmp.path().join("pkg/src/mod");
    fs::create_dir_all(&deep).unwrap();

    assert_eq!(find_project_config(&deep), Some(inner));
    assert_eq!(find_project_config(tmp.path()), Some(outer));
}

#[test]
fn prefers_toml_over_other_formats_in_one_dir() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "config.json", "{}");
    let toml = write(tmp.path(), "config.toml", "");
    assert_eq!(config_in(tmp.path()), Some(toml));
}

#[test]
fn project_overrides_global_by_name() {
    let tmp = TempDir::new().unwrap();
    let global = write(tmp.path(), "global/config.toml", GLOBAL);
    let project = write(tmp.path(), "proj/.tidy/config.toml", PROJECT);

    let loaded =
        load_config_layered(None, &tmp.path().join("proj"), Some(&global)).unwrap();
    assert_eq!(loaded.sources, vec![global, project]);

    let config = loaded.config;
    assert_eq!(config.tool("black").unwrap().timeout_ms, 3000);
    // Global-only tools survive the merge
    assert!(config.tool("ruff").is_some());
    // The project's language entry replaces the global one wholesale
    let rules = config.rules("python").unwrap();
    assert!(rules.format.is_some());
    assert!(rules.lint.is_none());
}

#[test]
fn explicit_path_is_used_alone() {
    let tmp = TempDir::new().unwrap();
    let global = write(tmp.path(), "global/config.toml", GLOBAL);
    write(tmp.path(), "proj/.tidy/config.toml", PROJECT);
    let explicit = write(tmp.path(), "custom.json", r#"{"tool": {}}"#);

    let loaded =
        load_config_layered(Some(&explicit), &tmp.path().join("proj"), Some(&global)).unwrap();
    assert_eq!(loaded.sources, vec![explicit]);
    assert_eq!(loaded.config.tools().count(), 0);
}

#[test]
fn no_sources_yields_empty_config() {
    let tmp = TempDir::new().unwrap();
    let loaded = load_config_layered(None, tmp.path(), None).unwrap();
    assert!(loaded.sources.is_empty());
    assert!(loaded.config.rules("python").is_none());
}

#[test]
fn invalid_project_config_fails_the_load() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), ".tidy/config.toml", "[language.python]\nformat = [\"black\"]");
    let err = load_config_layered(None, tmp.path(), None).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownTool { .. }));
}
