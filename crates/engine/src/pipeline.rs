// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline: resolver, prober and coordinator wired together for one file.

use crate::coordinator::{Coordinator, FormatRun, RunOptions};
use crate::error::EngineError;
use crate::probe::Prober;
use crate::resolver::{classify, resolve};
use crate::scheduler::RunRequest;
use parking_lot::RwLock;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tidy_adapters::{BufferProvider, ExecutableLocator, ProcessRunner};
use tidy_config::Config;
use tidy_core::{ExecutionPlan, FileId, RunId, RunReport, SelectionMode, ToolKind, TriggerKind};
use tokio_util::sync::CancellationToken;

/// Options for a one-shot format or lint call.
#[derive(Debug, Clone, Default)]
pub struct OneShot {
    /// Turn an empty plan into [`EngineError::NoApplicableTools`]
    pub require_tools: bool,
    pub cancel: CancellationToken,
}

impl OneShot {
    pub fn require_tools(mut self, require: bool) -> Self {
        self.require_tools = require;
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// The format stage of a scheduled run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatSummary {
    pub report: RunReport,
    /// The chain produced content different from the snapshot
    pub changed: bool,
    /// The content was written back to the buffer
    pub written: bool,
    /// The buffer changed while formatting was in flight; nothing was written
    pub stale: bool,
}

/// Everything a scheduled run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub run_id: RunId,
    pub file: FileId,
    pub trigger: TriggerKind,
    pub format: Option<FormatSummary>,
    pub lint: Option<RunReport>,
    /// Set when the run could not proceed (unreadable buffer, bad classifier)
    pub error: Option<String>,
    pub cancelled: bool,
    /// Dropped from the queue before it started
    pub superseded: bool,
}

impl RunOutcome {
    pub fn new(run_id: RunId, file: FileId, trigger: TriggerKind) -> Self {
        Self {
            run_id,
            file,
            trigger,
            format: None,
            lint: None,
            error: None,
            cancelled: false,
            superseded: false,
        }
    }

    pub fn superseded(run_id: RunId, file: FileId, trigger: TriggerKind) -> Self {
        Self { superseded: true, ..Self::new(run_id, file, trigger) }
    }

    /// No stage failed, timed out or was cut short.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
            && !self.cancelled
            && !self.superseded
            && self.format.as_ref().map_or(true, |f| f.report.succeeded() && !f.stale)
            && self.lint.as_ref().map_or(true, RunReport::succeeded)
    }
}

/// Resolves, plans and runs tools for one file at a time.
pub struct Pipeline<R, L> {
    config: RwLock<Arc<Config>>,
    prober: Prober<L>,
    coordinator: Coordinator<R>,
}

impl<R: ProcessRunner, L: ExecutableLocator> Pipeline<R, L> {
    pub fn new(config: Config, runner: R, locator: L) -> Self {
        let prober = Prober::new(locator, config.engine());
        Self {
            config: RwLock::new(Arc::new(config)),
            prober,
            coordinator: Coordinator::new(runner),
        }
    }

    /// Current configuration.
    pub fn config(&self) -> Arc<Config> {
        Arc::clone(&self.config.read())
    }

    pub fn prober(&self) -> &Prober<L> {
        &self.prober
    }

    pub fn coordinator(&self) -> &Coordinator<R> {
        &self.coordinator
    }

    /// Swap in a new configuration and drop every cached probe result.
    pub fn reload(&self, config: Config) {
        self.prober.reload(config.engine());
        *self.config.write() = Arc::new(config);
        tracing::info!("configuration reloaded");
    }

    /// Plan the tools of `kind` for `file`.
    ///
    /// A file with no classifier, or a classifier with no policy, yields an
    /// empty plan.
    pub fn plan(
        &self,
        file: &Path,
        classifier: Option<&str>,
        kind: ToolKind,
    ) -> Result<ExecutionPlan, EngineError> {
        let config = self.config();
        self.plan_with(&config, file, classifier, kind)
    }

    fn plan_with(
        &self,
        config: &Config,
        file: &Path,
        classifier: Option<&str>,
        kind: ToolKind,
    ) -> Result<ExecutionPlan, EngineError> {
        let root = self.prober.project_root(file);
        let Some(classifier) = classify(config, file, classifier) else {
            tracing::debug!(file = %file.display(), "no classifier");
            return Ok(ExecutionPlan::new(kind, SelectionMode::default(), "", root));
        };
        match resolve(config, classifier, kind)? {
            Some(resolved) => Ok(self.prober.plan(config, &resolved, kind, file, &root)),
            None => {
                tracing::debug!(file = %file.display(), classifier, %kind, "no policy");
                let canonical = config.canonical(classifier.trim());
                Ok(ExecutionPlan::new(kind, SelectionMode::default(), canonical, root))
            }
        }
    }

    /// Format `content` once, outside the scheduler.
    pub async fn format(
        &self,
        file: &Path,
        classifier: Option<&str>,
        content: &str,
        options: &OneShot,
    ) -> Result<FormatRun, EngineError> {
        let config = self.config();
        let plan = self.plan_with(&config, file, classifier, ToolKind::Formatter)?;
        require(&plan, options)?;
        let run_options =
            RunOptions::from_settings(config.engine()).with_cancel(options.cancel.clone());
        Ok(self.coordinator.format(&plan, file, content, &run_options).await)
    }

    /// Lint `content` once, outside the scheduler.
    pub async fn lint(
        &self,
        file: &Path,
        classifier: Option<&str>,
        content: &str,
        options: &OneShot,
    ) -> Result<RunReport, EngineError> {
        let config = self.config();
        let plan = self.plan_with(&config, file, classifier, ToolKind::Linter)?;
        require(&plan, options)?;
        let run_options =
            RunOptions::from_settings(config.engine()).with_cancel(options.cancel.clone());
        Ok(self.coordinator.lint(&plan, file, content, &run_options).await)
    }

    /// Run the stages of a scheduled request against the file's buffer.
    pub async fn run_stages<B: BufferProvider>(
        &self,
        buffers: &B,
        request: &RunRequest,
        cancel: &CancellationToken,
    ) -> RunOutcome {
        let mut outcome =
            RunOutcome::new(request.run_id.clone(), request.file.clone(), request.trigger);
        if let Err(e) = self.run_stages_inner(buffers, request, cancel, &mut outcome).await {
            tracing::warn!(
                file = %request.file,
                run_id = %request.run_id,
                error = %e,
                "run failed"
            );
            outcome.error = Some(e.to_string());
        }
        outcome
    }

    async fn run_stages_inner<B: BufferProvider>(
        &self,
        buffers: &B,
        request: &RunRequest,
        cancel: &CancellationToken,
        outcome: &mut RunOutcome,
    ) -> Result<(), EngineError> {
        let config = self.config();
        let options = RunOptions::from_settings(config.engine()).with_cancel(cancel.clone());
        let file = request.file.path();
        let snapshot = buffers.snapshot(&request.file).await?;
        let classifier = snapshot.classifier.as_deref();
        let mut content = snapshot.content.clone();

        for kind in &request.stages {
            let plan = self.plan_with(&config, file, classifier, *kind)?;
            match kind {
                ToolKind::Formatter => {
                    let run = self.coordinator.format(&plan, file, &content, &options).await;
                    outcome.cancelled |= run.report.cancelled;
                    let mut summary = FormatSummary {
                        report: run.report,
                        changed: run.changed,
                        written: false,
                        stale: false,
                    };
                    if run.changed && !cancel.is_cancelled() {
                        let current = buffers.snapshot(&request.file).await?;
                        if current.content == content {
                            buffers.apply(&request.file, &run.content).await?;
                            summary.written = true;
                            content = run.content;
                        } else {
                            tracing::info!(
                                file = %request.file,
                                run_id = %request.run_id,
                                "buffer changed during format, skipping write-back"
                            );
                            summary.stale = true;
                            content = current.content;
                        }
                    }
                    outcome.format = Some(summary);
                }
                ToolKind::Linter => {
                    let report = self.coordinator.lint(&plan, file, &content, &options).await;
                    outcome.cancelled |= report.cancelled;
                    outcome.lint = Some(report);
                }
            }
        }
        Ok(())
    }
}

fn require(plan: &ExecutionPlan, options: &OneShot) -> Result<(), EngineError> {
    if options.require_tools && plan.is_empty() {
        return Err(EngineError::NoApplicableTools {
            classifier: plan.classifier.clone(),
            kind: plan.kind,
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
