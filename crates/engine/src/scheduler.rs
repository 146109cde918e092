// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger scheduler: a pure, clock-driven state machine.
//!
//! The scheduler owns debounce windows and per-file serialization. It never
//! runs anything itself; every transition returns [`Dispatch`]es for the
//! runtime to carry out, and time only moves when the caller passes `now`.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;
use tidy_config::EngineSettings;
use tidy_core::{ConflictPolicy, FileId, RunId, ToolKind, TriggerEvent, TriggerKind};

/// A pipeline run the runtime should start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub run_id: RunId,
    pub file: FileId,
    pub trigger: TriggerKind,
    /// Stages to run, in order
    pub stages: Vec<ToolKind>,
    /// Timestamp of the event acted upon
    pub at_ms: u64,
}

/// Work for the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Start(RunRequest),
    /// Cooperatively cancel an in-flight run
    Cancel { file: FileId, run_id: RunId },
    /// A queued run was superseded before it started
    Drop { file: FileId, run_id: RunId, trigger: TriggerKind },
}

/// Result of pushing one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub run_id: RunId,
    pub dispatches: Vec<Dispatch>,
}

#[derive(Debug)]
struct Running {
    run_id: RunId,
    trigger: TriggerKind,
    cancelled: bool,
}

#[derive(Debug)]
struct Debounce {
    run_id: RunId,
    at_ms: u64,
    deadline: Instant,
}

#[derive(Debug, Default)]
struct FileState {
    running: Option<Running>,
    queue: VecDeque<RunRequest>,
    debounce: Option<Debounce>,
}

impl FileState {
    fn is_idle(&self) -> bool {
        self.running.is_none() && self.queue.is_empty() && self.debounce.is_none()
    }
}

/// Per-file debounce, queueing and supersession.
#[derive(Debug)]
pub struct Scheduler {
    settings: EngineSettings,
    files: HashMap<FileId, FileState>,
}

impl Scheduler {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings, files: HashMap::new() }
    }

    /// Adopt new settings; in-flight and queued runs are unaffected.
    pub fn reload(&mut self, settings: EngineSettings) {
        self.settings = settings;
    }

    /// Accept an event. Debounced kinds open or extend the file's quiet
    /// window; other kinds are admitted immediately.
    pub fn push(&mut self, event: TriggerEvent, now: Instant) -> Admission {
        let TriggerEvent { kind, file, at_ms } = event;
        if kind.is_debounced() {
            let deadline = now + self.settings.quiet_window;
            let state = self.files.entry(file).or_default();
            let run_id = match &mut state.debounce {
                Some(pending) => {
                    pending.at_ms = at_ms;
                    pending.deadline = deadline;
                    pending.run_id.clone()
                }
                None => {
                    let run_id = RunId::new();
                    state.debounce = Some(Debounce { run_id: run_id.clone(), at_ms, deadline });
                    run_id
                }
            };
            return Admission { run_id, dispatches: Vec::new() };
        }

        let request = self.request(RunId::new(), file, kind, at_ms);
        let run_id = request.run_id.clone();
        let dispatches = self.admit(request);
        Admission { run_id, dispatches }
    }

    /// Admit every debounced run whose quiet window has elapsed.
    pub fn tick(&mut self, now: Instant) -> Vec<Dispatch> {
        let mut due: Vec<(Instant, FileId)> = self
            .files
            .iter()
            .filter_map(|(file, state)| {
                let pending = state.debounce.as_ref()?;
                (pending.deadline <= now).then(|| (pending.deadline, file.clone()))
            })
            .collect();
        due.sort();

        let mut dispatches = Vec::new();
        for (_, file) in due {
            let Some(pending) = self.files.get_mut(&file).and_then(|s| s.debounce.take()) else {
                continue;
            };
            let request =
                self.request(pending.run_id, file, TriggerKind::TextChanged, pending.at_ms);
            dispatches.extend(self.admit(request));
        }
        dispatches
    }

    /// Record that a run finished; starts the file's next queued run.
    pub fn complete(&mut self, file: &FileId, run_id: &RunId) -> Vec<Dispatch> {
        let Some(state) = self.files.get_mut(file) else {
            return Vec::new();
        };
        if !matches!(&state.running, Some(r) if &r.run_id == run_id) {
            return Vec::new();
        }
        state.running = None;
        let mut dispatches = Vec::new();
        if let Some(next) = state.queue.pop_front() {
            state.running = Some(Running {
                run_id: next.run_id.clone(),
                trigger: next.trigger,
                cancelled: false,
            });
            dispatches.push(Dispatch::Start(next));
        }
        if state.is_idle() {
            self.files.remove(file);
        }
        dispatches
    }

    /// Earliest debounce deadline across all files.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.files.values().filter_map(|s| s.debounce.as_ref().map(|d| d.deadline)).min()
    }

    pub fn is_running(&self, file: &FileId) -> bool {
        self.files.get(file).is_some_and(|s| s.running.is_some())
    }

    pub fn queued(&self, file: &FileId) -> usize {
        self.files.get(file).map_or(0, |s| s.queue.len())
    }

    pub fn is_debouncing(&self, file: &FileId) -> bool {
        self.files.get(file).is_some_and(|s| s.debounce.is_some())
    }

    fn request(&self, run_id: RunId, file: FileId, trigger: TriggerKind, at_ms: u64) -> RunRequest {
        let stages = self.settings.stages(trigger).to_vec();
        RunRequest { run_id, file, trigger, stages, at_ms }
    }

    fn admit(&mut self, request: RunRequest) -> Vec<Dispatch> {
        let policy = self.settings.conflict(request.trigger);
        let state = self.files.entry(request.file.clone()).or_default();
        if state.running.is_none() {
            state.running = Some(Running {
                run_id: request.run_id.clone(),
                trigger: request.trigger,
                cancelled: false,
            });
            return vec![Dispatch::Start(request)];
        }

        let mut dispatches = Vec::new();
        match policy {
            ConflictPolicy::Queue => {
                tracing::debug!(
                    file = %request.file,
                    run_id = %request.run_id,
                    "queued behind in-flight run"
                );
            }
            ConflictPolicy::Supersede => {
                // Saved runs are only superseded by another save
                let saving = request.trigger == TriggerKind::Saved;
                if let Some(running) = state
                    .running
                    .as_mut()
                    .filter(|r| !r.cancelled && (r.trigger != TriggerKind::Saved || saving))
                {
                    running.cancelled = true;
                    dispatches.push(Dispatch::Cancel {
                        file: request.file.clone(),
                        run_id: running.run_id.clone(),
                    });
                }
                let (kept, dropped): (VecDeque<_>, VecDeque<_>) = state
                    .queue
                    .drain(..)
                    .partition(|queued| queued.trigger == TriggerKind::Saved);
                state.queue = kept;
                dispatches.extend(
                    dropped.into_iter().map(|r| Dispatch::Drop {
                        file: r.file,
                        run_id: r.run_id,
                        trigger: r.trigger,
                    }),
                );
                tracing::debug!(
                    file = %request.file,
                    run_id = %request.run_id,
                    "superseding in-flight run"
                );
            }
        }
        state.queue.push_back(request);
        dispatches
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
