// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rule resolver: classifier to language policy.

use crate::error::EngineError;
use std::path::Path;
use tidy_config::{Config, FALLBACK_LANGUAGE};
use tidy_core::{LanguagePolicy, ToolKind};

/// A policy found for a classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'a> {
    /// Canonical classifier after alias normalization
    pub classifier: &'a str,
    pub policy: &'a LanguagePolicy,
    /// True when the `"_"` fallback language supplied the policy
    pub fallback: bool,
}

/// Look up the policy of `kind` for `classifier`.
///
/// `Ok(None)` means no policy: the caller does nothing and succeeds.
pub fn resolve<'a>(
    config: &'a Config,
    classifier: &'a str,
    kind: ToolKind,
) -> Result<Option<Resolved<'a>>, EngineError> {
    let classifier = classifier.trim();
    if classifier.is_empty() {
        return Err(EngineError::EmptyClassifier);
    }
    let canonical = config.canonical(classifier);
    if let Some(policy) = config.rules(canonical).and_then(|r| r.policy(kind)) {
        return Ok(Some(Resolved { classifier: canonical, policy, fallback: false }));
    }
    let fallback = config.rules(FALLBACK_LANGUAGE).and_then(|r| r.policy(kind));
    Ok(fallback.map(|policy| Resolved { classifier: canonical, policy, fallback: true }))
}

/// Classifier for a file: the buffer's own when known, else from the extension.
pub fn classify<'a>(config: &'a Config, path: &Path, known: Option<&'a str>) -> Option<&'a str> {
    known.filter(|c| !c.trim().is_empty()).or_else(|| config.classify(path))
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
