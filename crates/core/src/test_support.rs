// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{Invocation, LanguagePolicy, SelectionMode, ToolName, ToolSpec};
use std::sync::Arc;

// ── Proptest strategies ─────────────────────────────────────────────────

pub mod strategies {
    use crate::{SelectionMode, TriggerKind};
    use proptest::prelude::*;

    pub fn arb_selection_mode() -> impl Strategy<Value = SelectionMode> {
        prop_oneof![Just(SelectionMode::StopAtFirstAvailable), Just(SelectionMode::RunAllInOrder)]
    }

    pub fn arb_trigger_kind() -> impl Strategy<Value = TriggerKind> {
        prop_oneof![
            Just(TriggerKind::Saved),
            Just(TriggerKind::TextChanged),
            Just(TriggerKind::FocusEntered),
            Just(TriggerKind::InsertExited),
        ]
    }
}

// ── Spec factories ──────────────────────────────────────────────────────

/// Formatter whose command is its own name, reading stdin.
pub fn formatter(name: &str) -> ToolSpec {
    ToolSpec::formatter(name, Invocation::new(name, Vec::<String>::new()))
}

/// Linter whose command is its own name, linting `${file}`.
pub fn linter(name: &str) -> ToolSpec {
    ToolSpec::linter(name, Invocation::new(name, ["${file}"]))
}

pub fn shared(spec: ToolSpec) -> Arc<ToolSpec> {
    Arc::new(spec)
}

/// Policy over the given tool names.
///
/// Panics on an empty list; tests only.
#[allow(clippy::expect_used)]
pub fn policy(names: &[&str], mode: SelectionMode) -> LanguagePolicy {
    LanguagePolicy::new(names.iter().map(|n| ToolName::from(*n)).collect(), mode)
        .expect("test policy must name at least one tool")
}
