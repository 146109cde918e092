// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tidy lint` - run linters and print their diagnostics.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tidy_core::RunReport;
use tidy_engine::{EngineError, OneShot};

use super::input::{display_path, read_inputs};
use crate::context::Context;
use crate::exit_error::ExitError;
use crate::output::{format_or_json, render_diagnostics, render_report, OutputFormat};

#[derive(Args)]
pub struct LintArgs {
    /// Files to lint; `-` reads stdin
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    /// Language classifier, overriding extension detection
    #[arg(long)]
    pub language: Option<String>,
    /// Path used to classify stdin input
    #[arg(long)]
    pub stdin_filename: Option<PathBuf>,
    /// Fail when no linter applies
    #[arg(long)]
    pub require_tools: bool,
}

#[derive(Serialize)]
struct FileReport<'a> {
    file: &'a Path,
    report: &'a RunReport,
}

pub async fn handle(args: LintArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let pipeline = ctx.pipeline();
    let inputs = read_inputs(ctx, &args.files, args.stdin_filename.as_deref()).await?;
    let options = OneShot::default().require_tools(args.require_tools);

    let mut reports = Vec::with_capacity(inputs.len());
    for input in &inputs {
        let language = args.language.as_deref();
        let shown = display_path(ctx, &input.path);
        match pipeline.lint(&input.path, language, &input.content, &options).await {
            Ok(report) => reports.push((shown, report)),
            Err(e @ EngineError::NoApplicableTools { .. }) => {
                return Err(ExitError::failed(format!("{}: {e}", shown.display())).into());
            }
            Err(e) => return Err(e.into()),
        }
    }

    let failed = reports.iter().any(|(_, r)| r.first_failure().is_some());
    let found = reports.iter().any(|(_, r)| r.diagnostics().next().is_some());

    let json: Vec<FileReport<'_>> =
        reports.iter().map(|(file, report)| FileReport { file, report }).collect();
    format_or_json(format, &json, || {
        for (file, report) in &reports {
            print!("{}", render_diagnostics(file, report.diagnostics()));
            if report.first_failure().is_some() {
                eprintln!("{}:", file.display());
                eprint!("{}", render_report(report));
            }
        }
    })?;

    if failed {
        return Err(ExitError::failed("").into());
    }
    if found {
        return Err(ExitError::changed("").into());
    }
    Ok(())
}
