// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution coordinator: runs a plan against buffer content.
//!
//! Formatter plans are chains: each step's output is the next step's input,
//! and a failed step halts the chain and rolls content back according to
//! the [`RollbackPolicy`]. Linter plans run concurrently and their
//! diagnostics are reassembled in policy order.

use crate::diagnostics::{stream_text, DiagnosticParser};
use futures_util::future::join_all;
use std::path::Path;
use std::time::Duration;
use tidy_adapters::{ProcessError, ProcessInput, ProcessOutput, ProcessRequest, ProcessRunner};
use tidy_config::template::{uses_input, TemplateVars};
use tidy_config::EngineSettings;
use tidy_core::{
    ExecutionPlan, ExecutionResult, PlannedTool, RollbackPolicy, RunReport, ToolKind, ToolSpec,
    WorkingDir,
};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Per-run execution options.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub rollback: RollbackPolicy,
    /// Wall-clock cap for the whole run
    pub aggregate_ceiling: Option<Duration>,
    /// Checked between chain steps
    pub cancel: CancellationToken,
}

impl RunOptions {
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self {
            rollback: settings.rollback,
            aggregate_ceiling: settings.aggregate_ceiling,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Result of a formatter chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatRun {
    pub report: RunReport,
    /// Content to keep: the chain's output, or the rollback state
    pub content: String,
    /// True when `content` differs from the input
    pub changed: bool,
}

/// Runs plans through an injected [`ProcessRunner`].
pub struct Coordinator<R> {
    runner: R,
    parser: DiagnosticParser,
}

impl<R: ProcessRunner> Coordinator<R> {
    pub fn new(runner: R) -> Self {
        Self { runner, parser: DiagnosticParser::new() }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run a formatter chain over `content`.
    pub async fn format(
        &self,
        plan: &ExecutionPlan,
        file: &Path,
        content: &str,
        options: &RunOptions,
    ) -> FormatRun {
        let deadline = options.aggregate_ceiling.map(|c| Instant::now() + c);
        let mut current = content.to_string();
        let mut results = Vec::with_capacity(plan.len());
        let mut halted = false;
        let mut cancelled = false;

        for entry in &plan.entries {
            let name = entry.name().clone();
            if halted {
                results.push(ExecutionResult::skipped(name, "an earlier step did not succeed"));
                continue;
            }
            if options.cancel.is_cancelled() {
                cancelled = true;
                results.push(ExecutionResult::skipped(name, "cancelled"));
                continue;
            }
            let Some(timeout) = step_timeout(&entry.spec, deadline) else {
                halted = true;
                results.push(ExecutionResult::skipped(name, "aggregate ceiling elapsed"));
                continue;
            };

            let result = self.invoke(plan, entry, file, &current, timeout).await;
            match result.formatted_text() {
                Some(text) => current = text.to_string(),
                None => halted = true,
            }
            results.push(result);
        }

        // A cancelled chain never yields transformed content
        let output = if cancelled {
            content.to_string()
        } else if halted {
            match options.rollback {
                RollbackPolicy::Atomic => content.to_string(),
                RollbackPolicy::KeepPartial => current,
            }
        } else {
            current
        };
        let mut report = RunReport::new(ToolKind::Formatter, plan.mode, results);
        report.cancelled = cancelled;
        FormatRun { changed: output != content, report, content: output }
    }

    /// Run every linter in the plan concurrently.
    pub async fn lint(
        &self,
        plan: &ExecutionPlan,
        file: &Path,
        content: &str,
        options: &RunOptions,
    ) -> RunReport {
        if options.cancel.is_cancelled() {
            let results = plan
                .entries
                .iter()
                .map(|e| ExecutionResult::skipped(e.name().clone(), "cancelled"));
            let mut report = RunReport::new(ToolKind::Linter, plan.mode, results.collect());
            report.cancelled = !plan.is_empty();
            return report;
        }
        let deadline = options.aggregate_ceiling.map(|c| Instant::now() + c);
        let runs = plan.entries.iter().map(|entry| async move {
            match step_timeout(&entry.spec, deadline) {
                Some(timeout) => self.invoke(plan, entry, file, content, timeout).await,
                None => ExecutionResult::skipped(entry.name().clone(), "aggregate ceiling elapsed"),
            }
        });
        RunReport::new(ToolKind::Linter, plan.mode, join_all(runs).await)
    }

    async fn invoke(
        &self,
        plan: &ExecutionPlan,
        entry: &PlannedTool,
        file: &Path,
        content: &str,
        timeout: Duration,
    ) -> ExecutionResult {
        let spec = &entry.spec;
        let request = build_request(plan, entry, file, content, timeout);

        let start = Instant::now();
        let outcome = tokio::time::timeout(timeout, self.runner.run(request)).await;
        let elapsed = start.elapsed();
        let elapsed_ms = elapsed.as_millis() as u64;

        let result = match outcome {
            Err(_) | Ok(Err(ProcessError::TimedOut { .. })) => {
                ExecutionResult::timed_out(spec.name.clone(), timeout, elapsed)
            }
            Ok(Err(e)) => ExecutionResult::failure(spec.name.clone(), e.to_string(), None, elapsed),
            Ok(Ok(output)) => self.interpret(spec, content, output, elapsed),
        };

        match &result.error_message {
            None => tracing::info!(
                tool = %spec.name,
                file = %file.display(),
                elapsed_ms,
                "tool succeeded"
            ),
            Some(error) => tracing::warn!(
                tool = %spec.name,
                file = %file.display(),
                status = %result.status,
                elapsed_ms,
                error = %error,
                "tool did not succeed"
            ),
        }
        result
    }

    fn interpret(
        &self,
        spec: &ToolSpec,
        content: &str,
        output: ProcessOutput,
        elapsed: Duration,
    ) -> ExecutionResult {
        let name = spec.name.clone();
        let Some(code) = output.exit_code else {
            return ExecutionResult::failure(name, "terminated by signal", None, elapsed);
        };
        if !spec.accepts_exit(code) {
            let message = failure_message(&output, code);
            return ExecutionResult::failure(name, message, Some(code), elapsed);
        }
        match spec.kind {
            ToolKind::Formatter => {
                let text = output.rewritten.unwrap_or(output.stdout);
                if text.is_empty() && !content.is_empty() {
                    return ExecutionResult::failure(
                        name,
                        "produced no output",
                        Some(code),
                        elapsed,
                    );
                }
                let changed = text != content;
                ExecutionResult::formatted(name, text, changed, elapsed)
            }
            ToolKind::Linter => {
                let text = stream_text(spec.stream, &output.stdout, &output.stderr);
                match self.parser.parse(&spec.name, &spec.parser, &text) {
                    Ok(items) => ExecutionResult::diagnostics(name, items, Some(code), elapsed),
                    Err(message) => ExecutionResult::failure(name, message, Some(code), elapsed),
                }
            }
        }
    }
}

/// Effective timeout of a step, or `None` once the ceiling is exhausted.
fn step_timeout(spec: &ToolSpec, deadline: Option<Instant>) -> Option<Duration> {
    match deadline {
        None => Some(spec.timeout()),
        Some(deadline) => {
            let remaining = deadline.saturating_duration_since(Instant::now());
            (!remaining.is_zero()).then(|| spec.timeout().min(remaining))
        }
    }
}

fn build_request(
    plan: &ExecutionPlan,
    entry: &PlannedTool,
    file: &Path,
    content: &str,
    timeout: Duration,
) -> ProcessRequest {
    let spec = &entry.spec;
    let file_dir = file.parent().unwrap_or(&plan.project_root);
    let vars = TemplateVars::for_file(file, &plan.project_root, &plan.classifier);
    let args = vars.expand(&spec.arg_template());

    let input = if spec.stdin {
        ProcessInput::Stdin(content.to_string())
    } else if uses_input(&args) {
        ProcessInput::TempFile {
            content: content.to_string(),
            dir: Some(file_dir.to_path_buf()).filter(|d| d.is_dir()),
            suffix: file
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default(),
        }
    } else {
        ProcessInput::None
    };
    let cwd = match spec.cwd {
        WorkingDir::Root => plan.project_root.as_path(),
        WorkingDir::FileDir => file_dir,
    };

    ProcessRequest::new(&entry.executable, args, cwd)
        .env(spec.env.clone())
        .input(input)
        .timeout(timeout)
}

fn failure_message(output: &ProcessOutput, code: i32) -> String {
    let detail = [output.stderr.trim(), output.stdout.trim()]
        .into_iter()
        .find(|s| !s.is_empty());
    match detail {
        Some(detail) => format!("exited with code {code}: {detail}"),
        None => format!("exited with code {code}"),
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
