// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tidy watch` - drive the engine from file-system events.

use anyhow::Result;
use clap::Args;
use notify::{Event as NotifyEvent, EventKind, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tidy_adapters::{FsBuffers, LocalProcessRunner};
use tidy_core::{Clock, SystemClock, TriggerEvent, TriggerKind};
use tidy_engine::{Engine, EngineDeps, RunOutcome};

use crate::context::{locator, Context};
use crate::output::{render_diagnostics, render_report, OutputFormat};

#[derive(Args)]
pub struct WatchArgs {
    /// Files or directories to watch (default: current directory)
    pub paths: Vec<PathBuf>,
    /// Treat changes as saves: format and write back, then lint
    #[arg(long)]
    pub format: bool,
}

/// Files the engine itself writes while staging output
fn is_staging_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(".tidy-") || n.ends_with(".tidy-tmp"))
}

pub async fn handle(args: WatchArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let config = ctx.loaded.config.clone();
    let deps = EngineDeps {
        buffers: FsBuffers::new(),
        runner: LocalProcessRunner::new(),
        locator: locator(config.engine()),
    };
    let clock = SystemClock;
    let (engine, mut outcomes) = Engine::new(config, deps, clock);
    let timer = engine.start_timer();

    let (tx, mut rx) = tokio::sync::mpsc::channel::<PathBuf>(256);
    let mut watcher = notify::recommended_watcher(move |res: Result<NotifyEvent, _>| {
        if let Ok(event) = res {
            if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                for path in event.paths {
                    let _ = tx.blocking_send(path);
                }
            }
        }
    })?;
    let paths = if args.paths.is_empty() { vec![ctx.cwd.clone()] } else { args.paths.clone() };
    for path in &paths {
        watcher.watch(&ctx.resolve(path), RecursiveMode::Recursive)?;
    }
    eprintln!("watching {} path(s); ctrl-c to stop", paths.len());

    let kind = if args.format { TriggerKind::Saved } else { TriggerKind::TextChanged };
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            Some(path) = rx.recv() => {
                if is_staging_file(&path) || !path.is_file() {
                    continue;
                }
                if ctx.loaded.config.classify(&path).is_none() {
                    continue;
                }
                let event = TriggerEvent::new(kind, path, clock.epoch_ms());
                engine.trigger(event)?;
            }
            Some(outcome) = outcomes.recv() => print_outcome(ctx, &outcome, format)?,
            _ = &mut ctrl_c => break,
        }
    }

    engine.shutdown();
    let _ = timer.await;
    Ok(())
}

fn print_outcome(ctx: &Context, outcome: &RunOutcome, format: OutputFormat) -> Result<()> {
    if outcome.superseded {
        return Ok(());
    }
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string(outcome)?);
        return Ok(());
    }
    let file = outcome.file.path();
    let shown = file.strip_prefix(&ctx.cwd).unwrap_or(file);
    if let Some(error) = &outcome.error {
        eprintln!("{}: {error}", shown.display());
    }
    if let Some(summary) = &outcome.format {
        if summary.written {
            eprintln!("formatted {}", shown.display());
        } else if summary.stale {
            eprintln!("{} changed while formatting; not written", shown.display());
        }
        if summary.report.first_failure().is_some() {
            eprint!("{}", render_report(&summary.report));
        }
    }
    if let Some(report) = &outcome.lint {
        print!("{}", render_diagnostics(shown, report.diagnostics()));
        if report.first_failure().is_some() {
            eprint!("{}", render_report(report));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
