// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tidy plan` - show which tools would run for a file.

use anyhow::Result;
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use tidy_core::ToolKind;

use crate::context::Context;
use crate::output::{format_or_json, render_plan, OutputFormat};

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum Stage {
    Format,
    Lint,
    #[default]
    All,
}

impl Stage {
    fn kinds(self) -> &'static [ToolKind] {
        match self {
            Stage::Format => &[ToolKind::Formatter],
            Stage::Lint => &[ToolKind::Linter],
            Stage::All => &[ToolKind::Formatter, ToolKind::Linter],
        }
    }
}

#[derive(Args)]
pub struct PlanArgs {
    /// File to plan for; it does not need to exist
    pub file: PathBuf,
    /// Language classifier, overriding extension detection
    #[arg(long)]
    pub language: Option<String>,
    #[arg(long, value_enum, default_value_t)]
    pub stage: Stage,
}

pub fn handle(args: PlanArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let pipeline = ctx.pipeline();
    let file = ctx.resolve(&args.file);
    let plans = args
        .stage
        .kinds()
        .iter()
        .map(|kind| pipeline.plan(&file, args.language.as_deref(), *kind))
        .collect::<Result<Vec<_>, _>>()?;

    format_or_json(format, &plans, || {
        for plan in &plans {
            print!("{}", render_plan(plan));
        }
    })
}
