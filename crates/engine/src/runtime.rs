// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine runtime: drives the [`Scheduler`] and runs pipelines on a worker pool.

use crate::error::EngineError;
use crate::pipeline::{Pipeline, RunOutcome};
use crate::scheduler::{Dispatch, RunRequest, Scheduler};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tidy_adapters::{BufferProvider, ExecutableLocator, ProcessRunner};
use tidy_config::Config;
use tidy_core::{Clock, FileId, RunId, TriggerEvent};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot, Notify, Semaphore};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Capacity of the outcome channel
const OUTCOME_BUFFER: usize = 256;

/// Collaborators the engine runs against.
pub struct EngineDeps<B, R, L> {
    pub buffers: B,
    pub runner: R,
    pub locator: L,
}

struct Inner<B, R, L, C> {
    pipeline: Pipeline<R, L>,
    buffers: B,
    scheduler: Mutex<Scheduler>,
    clock: C,
    workers: Arc<Semaphore>,
    outcome_tx: mpsc::Sender<RunOutcome>,
    waiters: Mutex<HashMap<RunId, oneshot::Sender<RunOutcome>>>,
    tokens: Mutex<HashMap<RunId, CancellationToken>>,
    /// Wakes the timer task when a debounce window opens or moves
    wake: Notify,
    shutdown: CancellationToken,
}

/// Trigger-driven orchestration engine.
///
/// Cheap to clone; clones share every piece of state.
pub struct Engine<B, R, L, C> {
    inner: Arc<Inner<B, R, L, C>>,
}

impl<B, R, L, C> Clone for Engine<B, R, L, C> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<B, R, L, C> Engine<B, R, L, C>
where
    B: BufferProvider,
    R: ProcessRunner,
    L: ExecutableLocator,
    C: Clock,
{
    /// Create an engine and the receiver every run outcome is sent on.
    pub fn new(
        config: Config,
        deps: EngineDeps<B, R, L>,
        clock: C,
    ) -> (Self, mpsc::Receiver<RunOutcome>) {
        let settings = config.engine().clone();
        let (outcome_tx, outcome_rx) = mpsc::channel(OUTCOME_BUFFER);
        let inner = Inner {
            workers: Arc::new(Semaphore::new(settings.workers)),
            scheduler: Mutex::new(Scheduler::new(settings)),
            pipeline: Pipeline::new(config, deps.runner, deps.locator),
            buffers: deps.buffers,
            clock,
            outcome_tx,
            waiters: Mutex::new(HashMap::new()),
            tokens: Mutex::new(HashMap::new()),
            wake: Notify::new(),
            shutdown: CancellationToken::new(),
        };
        (Self { inner: Arc::new(inner) }, outcome_rx)
    }

    pub fn pipeline(&self) -> &Pipeline<R, L> {
        &self.inner.pipeline
    }

    pub fn clock(&self) -> &C {
        &self.inner.clock
    }

    /// Submit an editing event. Returns the id of the run it joined or started.
    pub fn trigger(&self, event: TriggerEvent) -> Result<RunId, EngineError> {
        self.submit(event, None)
    }

    /// Save `file` and wait for its outcome, bounded by the save ceiling.
    ///
    /// When the ceiling elapses the run keeps going; its outcome still
    /// arrives on the outcome channel.
    pub async fn save(&self, file: impl Into<FileId>) -> Result<RunOutcome, EngineError> {
        let event = TriggerEvent::saved(file, self.inner.clock.epoch_ms());
        let ceiling = self.inner.pipeline.config().engine().save_ceiling;
        let (tx, rx) = oneshot::channel();
        let run_id = self.submit(event, Some(tx))?;

        match tokio::time::timeout(ceiling, rx).await {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(_)) => Err(EngineError::Shutdown),
            Err(_) => {
                self.inner.waiters.lock().remove(&run_id);
                let ceiling_ms = ceiling.as_millis() as u64;
                tracing::warn!(%run_id, ceiling_ms, "save ceiling elapsed");
                Err(EngineError::CeilingElapsed { ceiling })
            }
        }
    }

    fn submit(
        &self,
        event: TriggerEvent,
        waiter: Option<oneshot::Sender<RunOutcome>>,
    ) -> Result<RunId, EngineError> {
        if self.inner.shutdown.is_cancelled() {
            return Err(EngineError::Shutdown);
        }
        tracing::debug!(file = %event.file, trigger = %event.kind, "trigger");
        let debounced = event.kind.is_debounced();
        let admission = self.inner.scheduler.lock().push(event, self.inner.clock.now());
        if let Some(waiter) = waiter {
            self.inner.waiters.lock().insert(admission.run_id.clone(), waiter);
        }
        if debounced {
            self.inner.wake.notify_one();
        }
        self.dispatch(admission.dispatches);
        Ok(admission.run_id)
    }

    /// Admit every debounced run whose quiet window has elapsed.
    pub fn tick(&self) {
        let due = self.inner.scheduler.lock().tick(self.inner.clock.now());
        self.dispatch(due);
    }

    /// Spawn the task that fires debounce deadlines.
    ///
    /// Deadlines are compared against the engine clock, so use this with a
    /// real clock; tests with a fake clock call [`Engine::tick`] directly.
    pub fn start_timer(&self) -> JoinHandle<()> {
        let engine = self.clone();
        tokio::spawn(async move {
            loop {
                let deadline = engine.inner.scheduler.lock().next_deadline();
                let sleep = async {
                    match deadline {
                        Some(at) => {
                            tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await
                        }
                        None => std::future::pending().await,
                    }
                };
                tokio::select! {
                    _ = engine.inner.shutdown.cancelled() => break,
                    _ = engine.inner.wake.notified() => {}
                    _ = sleep => engine.tick(),
                }
            }
            tracing::debug!("debounce timer stopped");
        })
    }

    /// Adopt a new configuration. In-flight runs finish under the old one.
    ///
    /// The worker pool keeps the size it was created with.
    pub fn reload(&self, config: Config) {
        self.inner.scheduler.lock().reload(config.engine().clone());
        self.inner.pipeline.reload(config);
        self.inner.wake.notify_one();
    }

    /// Cancel every in-flight run and refuse new triggers.
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
        self.inner.waiters.lock().clear();
        self.inner.wake.notify_one();
        tracing::info!("engine shut down");
    }

    pub fn is_shutdown(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    fn dispatch(&self, dispatches: Vec<Dispatch>) {
        for dispatch in dispatches {
            match dispatch {
                Dispatch::Start(request) => self.start(request),
                Dispatch::Cancel { file, run_id } => {
                    if let Some(token) = self.inner.tokens.lock().get(&run_id) {
                        tracing::info!(%file, %run_id, "cancelling superseded run");
                        token.cancel();
                    }
                }
                Dispatch::Drop { file, run_id, trigger } => {
                    tracing::debug!(%file, %run_id, "dropped superseded run");
                    self.deliver(RunOutcome::superseded(run_id, file, trigger));
                }
            }
        }
    }

    fn start(&self, request: RunRequest) {
        let token = self.inner.shutdown.child_token();
        self.inner.tokens.lock().insert(request.run_id.clone(), token.clone());
        let engine = self.clone();
        tokio::spawn(async move {
            // The pool is never closed
            let permit = Arc::clone(&engine.inner.workers).acquire_owned().await.ok();
            let start = std::time::Instant::now();
            let outcome =
                engine.inner.pipeline.run_stages(&engine.inner.buffers, &request, &token).await;
            drop(permit);
            tracing::info!(
                file = %request.file,
                run_id = %request.run_id,
                trigger = %request.trigger,
                cancelled = outcome.cancelled,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "run finished"
            );
            engine.finish(outcome);
        });
    }

    fn finish(&self, outcome: RunOutcome) {
        self.inner.tokens.lock().remove(&outcome.run_id);
        let next = self.inner.scheduler.lock().complete(&outcome.file, &outcome.run_id);
        self.deliver(outcome);
        self.dispatch(next);
    }

    fn deliver(&self, outcome: RunOutcome) {
        if let Some(waiter) = self.inner.waiters.lock().remove(&outcome.run_id) {
            let _ = waiter.send(outcome.clone());
        }
        match self.inner.outcome_tx.try_send(outcome) {
            Ok(()) | Err(TrySendError::Closed(_)) => {}
            Err(TrySendError::Full(outcome)) => {
                tracing::warn!(run_id = %outcome.run_id, "outcome channel full, dropping outcome");
            }
        }
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
