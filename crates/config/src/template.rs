// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Argument template interpolation

use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

/// Regex pattern for ${variable_name}
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
pub static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("constant regex pattern is valid")
});

// Regex pattern for ${VAR:-default} environment variable expansion
#[allow(clippy::expect_used)]
static ENV_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(\w+):-([^}]*)\}").expect("constant regex pattern is valid"));

/// Interpolate `${name}` placeholders with values from the vars map
///
/// Also expands `${VAR:-default}` patterns from environment variables.
/// Environment variables are expanded first, then template variables.
///
/// Unknown template variables are left as-is.
pub fn interpolate(template: &str, vars: &HashMap<String, String>) -> String {
    let result = ENV_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            let var_name = &caps[1];
            let default_value = &caps[2];
            std::env::var(var_name).unwrap_or_else(|_| default_value.to_string())
        })
        .to_string();

    VAR_PATTERN
        .replace_all(&result, |caps: &regex::Captures| {
            let name = &caps[1];
            match vars.get(name) {
                Some(val) => val.clone(),
                None => caps[0].to_string(),
            }
        })
        .to_string()
}

/// True when any argument references `${input}`.
pub fn uses_input(args: &[String]) -> bool {
    args.iter().any(|a| a.contains("${input}"))
}

/// Per-file variables available to tool argument templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateVars {
    vars: HashMap<String, String>,
}

impl TemplateVars {
    /// Variables for `file` inside the project rooted at `root`.
    pub fn for_file(file: &Path, root: &Path, language: &str) -> Self {
        let dir = file.parent().unwrap_or(root);
        let relative = file.strip_prefix(root).unwrap_or(file);
        let mut vars = HashMap::new();
        vars.insert("file".to_string(), file.display().to_string());
        vars.insert("dir".to_string(), dir.display().to_string());
        vars.insert("root".to_string(), root.display().to_string());
        vars.insert("relative".to_string(), relative.display().to_string());
        vars.insert("language".to_string(), language.to_string());
        Self { vars }
    }

    /// Bind `${input}` to the temporary file holding the buffer content.
    pub fn with_input(mut self, input: &Path) -> Self {
        self.vars.insert("input".to_string(), input.display().to_string());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Interpolate every argument of a template.
    pub fn expand(&self, args: &[String]) -> Vec<String> {
        args.iter().map(|a| interpolate(a, &self.vars)).collect()
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
