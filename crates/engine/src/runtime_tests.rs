// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;
use tidy_adapters::{FakeLocator, FakeProcessRunner, FakeScript, MemoryBuffers, Snapshot};
use tidy_config::{EngineDef, EngineSettings};
use tidy_core::test_support::{formatter, linter, policy};
use tidy_core::{FakeClock, LanguageRules, SelectionMode, ToolKind, TriggerKind};
use tokio::time::Instant;

type TestEngine = Engine<MemoryBuffers, FakeProcessRunner, FakeLocator, FakeClock>;

const FILE: &str = "/proj/app.py";

struct Harness {
    engine: TestEngine,
    outcomes: mpsc::Receiver<RunOutcome>,
    runner: FakeProcessRunner,
    buffers: MemoryBuffers,
    clock: FakeClock,
}

fn settings(tweak: impl FnOnce(&mut EngineDef)) -> EngineSettings {
    let mut def = EngineDef::default();
    tweak(&mut def);
    EngineSettings::from_def(&def).unwrap()
}

fn config(settings: EngineSettings) -> Config {
    let python = LanguageRules {
        format: Some(policy(&["black"], SelectionMode::RunAllInOrder)),
        lint: Some(policy(&["ruff"], SelectionMode::RunAllInOrder)),
        extensions: vec!["py".to_string()],
    };
    Config::new(
        [formatter("black"), linter("ruff").stdin(true)],
        [("python".to_string(), python)],
        settings,
    )
}

fn harness(settings: EngineSettings) -> Harness {
    let runner = FakeProcessRunner::new();
    runner.script("black", FakeScript::transform(|s| s.replace("x=1", "x = 1")));
    let buffers = MemoryBuffers::new();
    buffers.insert(FILE, Snapshot::new("x=1\n"));
    let clock = FakeClock::new();
    let deps = EngineDeps {
        buffers: buffers.clone(),
        runner: runner.clone(),
        locator: FakeLocator::with(&["black", "ruff"]),
    };
    let (engine, outcomes) = Engine::new(config(settings), deps, clock.clone());
    Harness { engine, outcomes, runner, buffers, clock }
}

#[tokio::test]
async fn save_waits_for_format_and_lint() {
    let mut h = harness(EngineSettings::default());
    let outcome = h.engine.save(FILE).await.unwrap();

    assert_eq!(outcome.trigger, TriggerKind::Saved);
    assert!(outcome.succeeded());
    let format = outcome.format.as_ref().unwrap();
    assert!(format.written);
    assert_eq!(h.buffers.content(&FileId::from(FILE)).as_deref(), Some("x = 1\n"));
    assert_eq!(h.runner.programs(), ["black", "ruff"]);

    // Synchronous completions are also published
    let published = h.outcomes.recv().await.unwrap();
    assert_eq!(published.run_id, outcome.run_id);
}

#[tokio::test(start_paused = true)]
async fn save_gives_up_at_the_ceiling_but_the_run_continues() {
    let mut h = harness(settings(|def| def.save_ceiling_ms = 100));
    h.runner.script(
        "black",
        FakeScript::transform(|s| s.replace("x=1", "x = 1")).delay(Duration::from_millis(500)),
    );

    let err = h.engine.save(FILE).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::CeilingElapsed { ceiling } if ceiling == Duration::from_millis(100)
    ));

    let outcome = h.outcomes.recv().await.unwrap();
    assert!(outcome.format.unwrap().written);
}

#[tokio::test]
async fn edit_burst_lints_once_with_latest_content() {
    let mut h = harness(EngineSettings::default());
    let file = FileId::from(FILE);
    let mut first = None;
    for n in 1..=5 {
        h.buffers.edit(&file, format!("x={n}\n"));
        let run_id = h.engine.trigger(TriggerEvent::text_changed(FILE, n)).unwrap();
        first.get_or_insert(run_id);
        h.clock.advance_ms(100);
        h.engine.tick();
    }
    assert_eq!(h.runner.call_count("ruff"), 0);

    h.clock.advance_ms(300);
    h.engine.tick();
    let outcome = h.outcomes.recv().await.unwrap();

    assert_eq!(Some(&outcome.run_id), first.as_ref());
    assert!(outcome.format.is_none());
    assert_eq!(h.runner.call_count("ruff"), 1);
    let call = h.runner.calls().pop().unwrap();
    assert_eq!(call.input.as_deref(), Some("x=5\n"));
}

#[tokio::test]
async fn superseded_runs_are_reported() {
    let mut h = harness(EngineSettings::default());

    let focus = h.engine.trigger(TriggerEvent::new(TriggerKind::FocusEntered, FILE, 1)).unwrap();
    let dropped = h.engine.trigger(TriggerEvent::new(TriggerKind::InsertExited, FILE, 2)).unwrap();
    let latest = h.engine.trigger(TriggerEvent::new(TriggerKind::InsertExited, FILE, 3)).unwrap();

    let first = h.outcomes.recv().await.unwrap();
    assert_eq!(first.run_id, dropped);
    assert!(first.superseded);

    // Cancelled before its first step, so nothing ran
    let second = h.outcomes.recv().await.unwrap();
    assert_eq!(second.run_id, focus);
    assert!(second.cancelled);
    assert!(second.lint.unwrap().all_skipped());

    let third = h.outcomes.recv().await.unwrap();
    assert_eq!(third.run_id, latest);
    assert!(third.succeeded());
    assert_eq!(h.runner.call_count("ruff"), 1);
}

#[tokio::test(start_paused = true)]
async fn worker_pool_bounds_parallel_runs() {
    for (workers, expect_serial) in [(1, true), (2, false)] {
        let h = harness(settings(|def| def.workers = workers));
        h.runner.script(
            "black",
            FakeScript::transform(|s| s.to_string()).delay(Duration::from_millis(100)),
        );
        h.buffers.insert("/proj/other.py", Snapshot::new("y = 2\n"));

        let start = Instant::now();
        let (a, b) = tokio::join!(h.engine.save(FILE), h.engine.save("/proj/other.py"));
        a.unwrap();
        b.unwrap();
        let serial = start.elapsed() >= Duration::from_millis(200);
        assert_eq!(serial, expect_serial, "workers = {workers}");
    }
}

#[tokio::test]
async fn reload_changes_stages() {
    let mut h = harness(EngineSettings::default());
    let settings = EngineSettings::default()
        .with_stages(TriggerKind::FocusEntered, vec![ToolKind::Formatter]);
    h.engine.reload(config(settings));

    h.engine.trigger(TriggerEvent::new(TriggerKind::FocusEntered, FILE, 1)).unwrap();
    let outcome = h.outcomes.recv().await.unwrap();
    assert!(outcome.format.is_some());
    assert!(outcome.lint.is_none());
}

#[tokio::test]
async fn shutdown_refuses_new_triggers() {
    let h = harness(EngineSettings::default());
    h.engine.shutdown();
    assert!(h.engine.is_shutdown());
    assert!(matches!(
        h.engine.trigger(TriggerEvent::saved(FILE, 1)),
        Err(EngineError::Shutdown)
    ));
    assert!(matches!(h.engine.save(FILE).await, Err(EngineError::Shutdown)));
}

#[tokio::test]
async fn unknown_file_reports_buffer_error() {
    let mut h = harness(EngineSettings::default());
    h.engine.trigger(TriggerEvent::saved("/proj/missing.py", 1)).unwrap();
    let outcome = h.outcomes.recv().await.unwrap();
    assert!(outcome.error.is_some());
    assert!(!outcome.succeeded());
}
