// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tidy format` - run the formatter chain over files.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tidy_adapters::{BufferProvider, FsBuffers};
use tidy_core::{FileId, RunReport};
use tidy_engine::{EngineError, OneShot};

use super::input::{display_path, read_inputs};
use crate::context::Context;
use crate::exit_error::ExitError;
use crate::output::{format_or_json, render_report, OutputFormat};

#[derive(Args)]
pub struct FormatArgs {
    /// Files to format; `-` reads stdin
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    /// Write formatted content back to the files
    #[arg(long, short = 'w', conflicts_with = "check")]
    pub write: bool,
    /// Exit 1 when any file would change; nothing is written
    #[arg(long)]
    pub check: bool,
    /// Language classifier, overriding extension detection
    #[arg(long)]
    pub language: Option<String>,
    /// Path used to classify stdin input
    #[arg(long)]
    pub stdin_filename: Option<PathBuf>,
    /// Fail when no formatter applies
    #[arg(long)]
    pub require_tools: bool,
}

#[derive(Serialize)]
struct FileResult<'a> {
    file: &'a Path,
    changed: bool,
    written: bool,
    report: &'a RunReport,
}

pub async fn handle(args: FormatArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let pipeline = ctx.pipeline();
    let inputs = read_inputs(ctx, &args.files, args.stdin_filename.as_deref()).await?;
    let options = OneShot::default().require_tools(args.require_tools);

    let mut runs = Vec::with_capacity(inputs.len());
    for input in &inputs {
        let language = args.language.as_deref();
        let run = match pipeline.format(&input.path, language, &input.content, &options).await {
            Ok(run) => run,
            Err(e @ EngineError::NoApplicableTools { .. }) => {
                let shown = display_path(ctx, &input.path);
                return Err(ExitError::failed(format!("{}: {e}", shown.display())).into());
            }
            Err(e) => return Err(e.into()),
        };

        let mut written = false;
        if args.write && !input.stdin && run.changed {
            FsBuffers::new().apply(&FileId::new(&input.path), &run.content).await?;
            written = true;
        }
        runs.push((input, run, written));
    }

    let failed = runs.iter().any(|(_, run, _)| run.report.first_failure().is_some());
    let changed = runs.iter().any(|(_, run, _)| run.changed);

    let results: Vec<FileResult<'_>> = runs
        .iter()
        .map(|(input, run, written)| FileResult {
            file: display_path(ctx, &input.path),
            changed: run.changed,
            written: *written,
            report: &run.report,
        })
        .collect();
    format_or_json(format, &results, || {
        for (input, run, written) in &runs {
            let shown = display_path(ctx, &input.path);
            if run.report.first_failure().is_some() {
                eprintln!("{}:", shown.display());
                eprint!("{}", render_report(&run.report));
            }
            if args.check {
                if run.changed {
                    eprintln!("would reformat {}", shown.display());
                }
            } else if *written {
                eprintln!("formatted {}", shown.display());
            } else if !args.write || input.stdin {
                print!("{}", run.content);
            }
        }
        let _ = std::io::stdout().flush();
    })?;

    if failed {
        return Err(ExitError::failed("").into());
    }
    if args.check && changed {
        return Err(ExitError::changed("").into());
    }
    Ok(())
}
