// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tidy config` - validate and inspect the effective configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;

use crate::color;
use crate::context::Context;
use crate::output::{format_or_json, OutputFormat};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Load and validate the configuration
    Check {},
    /// Print the effective tools and language policies
    Show {},
}

pub fn handle(command: ConfigCommand, ctx: &Context, format: OutputFormat) -> Result<()> {
    match command {
        ConfigCommand::Check {} => handle_check(ctx, format),
        ConfigCommand::Show {} => handle_show(ctx, format),
    }
}

fn handle_check(ctx: &Context, format: OutputFormat) -> Result<()> {
    let config = &ctx.loaded.config;
    let data = json!({
        "valid": true,
        "sources": ctx.loaded.sources,
        "tools": config.tools().count(),
        "languages": config.languages().count(),
    });
    format_or_json(format, &data, || {
        if ctx.loaded.sources.is_empty() {
            println!("no configuration found; nothing will run");
            return;
        }
        for source in &ctx.loaded.sources {
            println!("{} {}", color::muted("source"), source.display());
        }
        println!(
            "ok: {} tools, {} languages",
            config.tools().count(),
            config.languages().count()
        );
    })
}

fn handle_show(ctx: &Context, format: OutputFormat) -> Result<()> {
    let config = &ctx.loaded.config;
    let tools: Vec<_> = config.tools().map(|t| t.as_ref()).collect();
    let languages: serde_json::Map<String, serde_json::Value> = config
        .languages()
        .map(|(name, rules)| (name.to_string(), json!(rules)))
        .collect();
    let data = json!({ "tools": tools, "languages": languages, "sources": ctx.loaded.sources });

    format_or_json(format, &data, || {
        println!("{}", color::header("tools"));
        for tool in &tools {
            let mut line = format!("  {} ({}): {}", tool.name, tool.kind, tool.invocation.command);
            if let Some(required) = &tool.required_config {
                line.push_str(&format!(" [requires {required}]"));
            }
            println!("{line}");
        }
        println!("{}", color::header("languages"));
        for (name, rules) in config.languages() {
            let policies = [("format", &rules.format), ("lint", &rules.lint)]
                .into_iter()
                .filter_map(|(label, policy)| {
                    let policy = policy.as_ref()?;
                    let names: Vec<&str> = policy.tools().iter().map(|t| t.as_str()).collect();
                    Some(format!("{label} = [{}] {}", names.join(", "), policy.mode()))
                })
                .collect::<Vec<_>>()
                .join("; ");
            let exts = rules.extensions.join(", ");
            println!("  {name} ({}): {policies}", if exts.is_empty() { "-" } else { &exts });
        }
    })
}
