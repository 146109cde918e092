// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn run_id_has_prefix_and_fixed_length() {
    let id = RunId::new();
    assert!(id.as_str().starts_with("run-"));
    assert_eq!(id.as_str().len(), 23);
}

#[test]
fn run_ids_are_unique() {
    assert_ne!(RunId::new(), RunId::new());
}

#[test]
fn from_string_keeps_the_value_verbatim() {
    let id = RunId::from_string("run-ü日本");
    assert_eq!(id.as_str(), "run-ü日本");
    assert_eq!(id.to_string(), "run-ü日本");
}

#[test]
fn run_id_serde_is_transparent() {
    let id = RunId::from_string("run-1");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"run-1\"");
    let parsed: RunId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, "run-1");
}
