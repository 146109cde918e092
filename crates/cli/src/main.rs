// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tidy: run formatter chains and linters configured per language

mod color;
mod commands;
mod context;
mod env;
mod exit_error;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{config, format, lint, plan, watch};
use context::Context;
use exit_error::{ExitError, EXIT_FAILED};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "tidy", version = env::VERSION, styles = color::styles())]
#[command(about = "Run the formatters and linters configured for each language")]
struct Cli {
    /// Config file; overrides TIDY_CONFIG and discovery
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Working directory used for config discovery and relative paths
    #[arg(short = 'C', long = "cwd", global = true)]
    cwd: Option<PathBuf>,

    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format files with their language's formatter chain
    Format(format::FormatArgs),
    /// Lint files and print diagnostics
    Lint(lint::LintArgs),
    /// Show the tools that would run for a file
    Plan(plan::PlanArgs),
    /// Validate or inspect configuration
    Config(config::ConfigArgs),
    /// Watch paths and run tools as files change
    Watch(watch::WatchArgs),
}

fn main() {
    let code = match run() {
        Ok(()) => 0,
        Err(e) => match e.downcast_ref::<ExitError>() {
            Some(exit) => {
                if !exit.message.is_empty() {
                    eprintln!("error: {}", exit.message);
                }
                exit.code
            }
            None => {
                eprintln!("error: {e:#}");
                EXIT_FAILED
            }
        },
    };
    std::process::exit(code);
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init(&env::log_filter(), env::log_file().as_deref())?;

    let current = std::env::current_dir()?;
    let cwd = cli.cwd.map_or_else(|| current.clone(), |dir| current.join(dir));
    let ctx = Context::load(cli.config.as_deref(), cwd)?;
    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

    runtime.block_on(async {
        match cli.command {
            Commands::Format(args) => format::handle(args, &ctx, cli.output).await,
            Commands::Lint(args) => lint::handle(args, &ctx, cli.output).await,
            Commands::Plan(args) => plan::handle(args, &ctx, cli.output),
            Commands::Config(args) => config::handle(args.command, &ctx, cli.output),
            Commands::Watch(args) => watch::handle(args, &ctx, cli.output).await,
        }
    })
}
