// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validated configuration: tool specs, language policies, aliases, settings.

use crate::defs::{ConfigFile, LanguageDef, ParserDef, PolicyDef, ToolDef};
use crate::error::ConfigError;
use crate::settings::EngineSettings;
use crate::template::uses_input;
use indexmap::IndexMap;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tidy_core::{
    DiagnosticFormat, Invocation, LanguagePolicy, LanguageRules, ToolKind, ToolName, ToolSpec,
};

/// Classifier of the rules applied when a language has no policy of its own.
pub const FALLBACK_LANGUAGE: &str = "_";

/// Immutable configuration for the process lifetime (until an explicit reload).
#[derive(Debug, Clone, Default)]
pub struct Config {
    tools: IndexMap<ToolName, Arc<ToolSpec>>,
    languages: IndexMap<String, LanguageRules>,
    aliases: HashMap<String, String>,
    extensions: HashMap<String, String>,
    engine: EngineSettings,
}

impl Config {
    /// Validate a parsed config file. Any error rejects the whole file.
    pub fn from_file(file: ConfigFile) -> Result<Self, ConfigError> {
        let engine = match &file.engine {
            Some(def) => EngineSettings::from_def(def)?,
            None => EngineSettings::default(),
        };

        let mut tools = IndexMap::with_capacity(file.tools.len());
        for (name, def) in file.tools {
            let spec = build_tool(&name, def)?;
            tools.insert(ToolName::from(name.as_str()), Arc::new(spec));
        }

        let mut languages = IndexMap::with_capacity(file.languages.len());
        let mut extensions: HashMap<String, String> = HashMap::new();
        for (classifier, def) in file.languages {
            if classifier.trim().is_empty() {
                return Err(ConfigError::invalid("language", "classifier must not be empty"));
            }
            let rules = build_language(&classifier, def, &tools)?;
            for ext in &rules.extensions {
                if let Some(existing) = extensions.insert(ext.clone(), classifier.clone()) {
                    return Err(ConfigError::invalid(
                        format!("language.{classifier}.extensions"),
                        format!("extension '{ext}' is already claimed by '{existing}'"),
                    ));
                }
            }
            languages.insert(classifier, rules);
        }

        let mut aliases = HashMap::with_capacity(file.aliases.len());
        for (alias, target) in file.aliases {
            if !languages.contains_key(&target) {
                return Err(ConfigError::invalid(
                    format!("aliases.{alias}"),
                    format!("targets unknown language '{target}'"),
                ));
            }
            aliases.insert(alias, target);
        }

        Ok(Self { tools, languages, aliases, extensions, engine })
    }

    /// Build programmatically from already-validated parts.
    pub fn new(
        tools: impl IntoIterator<Item = ToolSpec>,
        languages: impl IntoIterator<Item = (String, LanguageRules)>,
        engine: EngineSettings,
    ) -> Self {
        let tools = tools.into_iter().map(|t| (t.name.clone(), Arc::new(t))).collect();
        let languages: IndexMap<String, LanguageRules> = languages.into_iter().collect();
        let extensions = languages
            .iter()
            .flat_map(|(name, rules)| rules.extensions.iter().map(|e| (e.clone(), name.clone())))
            .collect();
        Self { tools, languages, aliases: HashMap::new(), extensions, engine }
    }

    pub fn with_alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), target.into());
        self
    }

    pub fn tool(&self, name: &str) -> Option<&Arc<ToolSpec>> {
        self.tools.get(name)
    }

    pub fn tools(&self) -> impl Iterator<Item = &Arc<ToolSpec>> {
        self.tools.values()
    }

    /// Resolve an alias to its canonical classifier.
    pub fn canonical<'a>(&'a self, classifier: &'a str) -> &'a str {
        self.aliases.get(classifier).map(String::as_str).unwrap_or(classifier)
    }

    pub fn rules(&self, classifier: &str) -> Option<&LanguageRules> {
        self.languages.get(classifier)
    }

    pub fn languages(&self) -> impl Iterator<Item = (&str, &LanguageRules)> {
        self.languages.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Classifier for a path, from its extension.
    pub fn classify(&self, path: &Path) -> Option<&str> {
        let ext = path.extension()?.to_str()?;
        self.extensions.get(ext).map(String::as_str)
    }

    pub fn engine(&self) -> &EngineSettings {
        &self.engine
    }
}

fn build_tool(name: &str, def: ToolDef) -> Result<ToolSpec, ConfigError> {
    let location = format!("tool.{name}");
    if name.trim().is_empty() {
        return Err(ConfigError::invalid("tool", "tool name must not be empty"));
    }
    if def.command.trim().is_empty() {
        return Err(ConfigError::invalid(format!("{location}.command"), "must not be empty"));
    }
    if def.timeout_ms == Some(0) {
        return Err(ConfigError::invalid(
            format!("{location}.timeout_ms"),
            "must be greater than 0",
        ));
    }
    if def.required_config.as_deref().is_some_and(|f| f.trim().is_empty() || f.contains('/')) {
        return Err(ConfigError::invalid(
            format!("{location}.required_config"),
            "must be a plain file name",
        ));
    }

    let mut spec = ToolSpec::new(name, def.kind, Invocation::new(def.command, def.args))
        .prepend_args(def.prepend_args)
        .append_args(def.append_args)
        .env(def.env)
        .cwd(def.cwd)
        .stream(def.stream);
    spec.required_config = def.required_config;
    if let Some(timeout_ms) = def.timeout_ms {
        spec.timeout_ms = timeout_ms;
    }
    if let Some(stdin) = def.stdin {
        spec.stdin = stdin;
    }
    if def.kind == ToolKind::Formatter && !spec.stdin && !uses_input(&spec.arg_template()) {
        return Err(ConfigError::invalid(
            format!("{location}.args"),
            "a formatter with stdin = false must pass ${input}",
        ));
    }
    if let Some(codes) = def.exit_codes {
        if codes.is_empty() {
            return Err(ConfigError::invalid(format!("{location}.exit_codes"), "must not be empty"));
        }
        spec.exit_codes = codes;
    }
    if let Some(parser) = def.parser {
        if def.kind == ToolKind::Formatter {
            return Err(ConfigError::invalid(
                format!("{location}.parser"),
                "only linters produce diagnostics",
            ));
        }
        spec.parser = build_parser(&location, parser)?;
    }
    Ok(spec)
}

fn build_parser(location: &str, def: ParserDef) -> Result<DiagnosticFormat, ConfigError> {
    match def {
        ParserDef::Named(name) => match name.as_str() {
            "lines" => Ok(DiagnosticFormat::Lines),
            "json" => Ok(DiagnosticFormat::Json),
            other => Err(ConfigError::invalid(
                format!("{location}.parser"),
                format!("unknown parser '{other}' (expected lines, json, or {{ regex = ... }})"),
            )),
        },
        ParserDef::Regex { regex } => {
            let compiled = Regex::new(&regex).map_err(|e| {
                ConfigError::invalid(format!("{location}.parser.regex"), e.to_string())
            })?;
            if !compiled.capture_names().flatten().any(|n| n == "message") {
                return Err(ConfigError::invalid(
                    format!("{location}.parser.regex"),
                    "pattern must define a named group 'message'",
                ));
            }
            Ok(DiagnosticFormat::Regex { pattern: regex })
        }
    }
}

fn build_language(
    classifier: &str,
    def: LanguageDef,
    tools: &IndexMap<ToolName, Arc<ToolSpec>>,
) -> Result<LanguageRules, ConfigError> {
    let mut extensions = Vec::with_capacity(def.extensions.len());
    for ext in def.extensions {
        let ext = ext.trim_start_matches('.').to_string();
        if ext.is_empty() {
            return Err(ConfigError::invalid(
                format!("language.{classifier}.extensions"),
                "extension must not be empty",
            ));
        }
        extensions.push(ext);
    }
    Ok(LanguageRules {
        format: build_policy(classifier, ToolKind::Formatter, def.format, tools)?,
        lint: build_policy(classifier, ToolKind::Linter, def.lint, tools)?,
        extensions,
    })
}

fn build_policy(
    classifier: &str,
    kind: ToolKind,
    def: Option<PolicyDef>,
    tools: &IndexMap<ToolName, Arc<ToolSpec>>,
) -> Result<Option<LanguagePolicy>, ConfigError> {
    let Some(def) = def else {
        return Ok(None);
    };
    let stage = match kind {
        ToolKind::Formatter => "format",
        ToolKind::Linter => "lint",
    };
    let location = format!("language.{classifier}.{stage}");
    let mut names = Vec::with_capacity(def.tools().len());
    for tool in def.tools() {
        let spec = tools.get(tool.as_str()).ok_or_else(|| ConfigError::UnknownTool {
            location: location.clone(),
            tool: tool.clone(),
        })?;
        if spec.kind != kind {
            return Err(ConfigError::KindMismatch {
                location: location.clone(),
                tool: tool.clone(),
                expected: kind.to_string(),
                actual: spec.kind.to_string(),
            });
        }
        let name = ToolName::from(tool.as_str());
        if names.contains(&name) {
            return Err(ConfigError::invalid(location, format!("tool '{tool}' listed twice")));
        }
        names.push(name);
    }
    LanguagePolicy::new(names, def.mode())
        .map(Some)
        .map_err(|e| ConfigError::invalid(location, e.to_string()))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
