// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;
use tidy_core::{Clock, FakeClock};

fn file(name: &str) -> FileId {
    FileId::new(format!("/proj/{name}"))
}

fn started(dispatches: &[Dispatch]) -> Vec<&RunRequest> {
    dispatches
        .iter()
        .filter_map(|d| match d {
            Dispatch::Start(request) => Some(request),
            _ => None,
        })
        .collect()
}

fn scheduler() -> Scheduler {
    Scheduler::new(EngineSettings::default())
}

#[test]
fn burst_of_edits_collapses_to_one_run_with_latest_timestamp() {
    let clock = FakeClock::new();
    let mut scheduler = scheduler();
    let a = file("a.py");

    let first = scheduler.push(TriggerEvent::text_changed(a.clone(), 1), clock.now());
    assert!(first.dispatches.is_empty());
    for at_ms in 2..=5 {
        clock.advance(Duration::from_millis(100));
        let admission = scheduler.push(TriggerEvent::text_changed(a.clone(), at_ms), clock.now());
        assert_eq!(admission.run_id, first.run_id);
        assert!(scheduler.tick(clock.now()).is_empty());
    }

    // Quiet window restarts with every edit
    clock.advance(Duration::from_millis(299));
    assert!(scheduler.tick(clock.now()).is_empty());
    clock.advance(Duration::from_millis(1));
    let dispatches = scheduler.tick(clock.now());
    let runs = started(&dispatches);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].run_id, first.run_id);
    assert_eq!(runs[0].at_ms, 5);
    assert_eq!(runs[0].stages, [ToolKind::Linter]);
    assert!(scheduler.next_deadline().is_none());
}

#[test]
fn next_deadline_tracks_earliest_window() {
    let clock = FakeClock::new();
    let mut scheduler = scheduler();
    let start = clock.now();
    scheduler.push(TriggerEvent::text_changed(file("a"), 1), start);
    clock.advance(Duration::from_millis(50));
    scheduler.push(TriggerEvent::text_changed(file("b"), 2), clock.now());
    assert_eq!(scheduler.next_deadline(), Some(start + Duration::from_millis(300)));
}

#[test]
fn save_starts_immediately_with_format_and_lint() {
    let clock = FakeClock::new();
    let mut scheduler = scheduler();
    let admission = scheduler.push(TriggerEvent::saved(file("a.py"), 10), clock.now());
    let runs = started(&admission.dispatches);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].run_id, admission.run_id);
    assert_eq!(runs[0].stages, [ToolKind::Formatter, ToolKind::Linter]);
    assert!(scheduler.is_running(&file("a.py")));
}

#[test]
fn saves_queue_behind_in_flight_run() {
    let clock = FakeClock::new();
    let mut scheduler = scheduler();
    let a = file("a.py");
    let first = scheduler.push(TriggerEvent::saved(a.clone(), 1), clock.now());
    let second = scheduler.push(TriggerEvent::saved(a.clone(), 2), clock.now());
    assert!(second.dispatches.is_empty());
    assert_eq!(scheduler.queued(&a), 1);

    let next = scheduler.complete(&a, &first.run_id);
    let runs = started(&next);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].run_id, second.run_id);

    assert!(scheduler.complete(&a, &second.run_id).is_empty());
    assert!(!scheduler.is_running(&a));
}

#[test]
fn edit_supersedes_in_flight_lint_run() {
    let clock = FakeClock::new();
    let mut scheduler = scheduler();
    let a = file("a.py");
    let event = TriggerEvent::new(TriggerKind::FocusEntered, a.clone(), 1);
    let focus = scheduler.push(event, clock.now());

    scheduler.push(TriggerEvent::text_changed(a.clone(), 2), clock.now());
    clock.advance(Duration::from_millis(300));
    let dispatches = scheduler.tick(clock.now());
    assert_eq!(
        dispatches,
        [Dispatch::Cancel { file: a.clone(), run_id: focus.run_id.clone() }]
    );
    assert_eq!(scheduler.queued(&a), 1);

    // The latest run starts once the cancelled one stops
    let runs = scheduler.complete(&a, &focus.run_id);
    assert_eq!(started(&runs)[0].trigger, TriggerKind::TextChanged);
}

#[test]
fn supersede_drops_queued_edits_but_keeps_saves() {
    let clock = FakeClock::new();
    let mut scheduler = scheduler();
    let a = file("a.py");
    let event = TriggerEvent::new(TriggerKind::FocusEntered, a.clone(), 1);
    let running = scheduler.push(event, clock.now());
    let save = scheduler.push(TriggerEvent::saved(a.clone(), 2), clock.now());
    let event = TriggerEvent::new(TriggerKind::InsertExited, a.clone(), 3);
    let insert = scheduler.push(event, clock.now());

    // The save queued; the insert-exit cancelled the focus run
    let cancel = Dispatch::Cancel { file: a.clone(), run_id: running.run_id.clone() };
    assert!(insert.dispatches.contains(&cancel));
    assert_eq!(scheduler.queued(&a), 2);

    let event = TriggerEvent::new(TriggerKind::InsertExited, a.clone(), 4);
    let latest = scheduler.push(event, clock.now());
    assert_eq!(
        latest.dispatches,
        [Dispatch::Drop {
            file: a.clone(),
            run_id: insert.run_id.clone(),
            trigger: TriggerKind::InsertExited,
        }]
    );
    assert_eq!(scheduler.queued(&a), 2);

    let next = scheduler.complete(&a, &running.run_id);
    assert_eq!(started(&next)[0].run_id, save.run_id);
    let next = scheduler.complete(&a, &save.run_id);
    assert_eq!(started(&next)[0].run_id, latest.run_id);
}

#[test]
fn edits_never_cancel_an_in_flight_save() {
    let clock = FakeClock::new();
    let mut scheduler = scheduler();
    let a = file("a.py");
    let save = scheduler.push(TriggerEvent::saved(a.clone(), 1), clock.now());
    let event = TriggerEvent::new(TriggerKind::FocusEntered, a.clone(), 2);
    let focus = scheduler.push(event, clock.now());
    assert!(focus.dispatches.is_empty());
    let next = scheduler.complete(&a, &save.run_id);
    assert_eq!(started(&next)[0].run_id, focus.run_id);
}

#[test]
fn files_are_independent() {
    let clock = FakeClock::new();
    let mut scheduler = scheduler();
    let a = scheduler.push(TriggerEvent::saved(file("a.py"), 1), clock.now());
    let b = scheduler.push(TriggerEvent::saved(file("b.py"), 1), clock.now());
    assert_eq!(started(&a.dispatches).len(), 1);
    assert_eq!(started(&b.dispatches).len(), 1);
}

#[test]
fn stale_completion_is_ignored() {
    let clock = FakeClock::new();
    let mut scheduler = scheduler();
    let a = file("a.py");
    let first = scheduler.push(TriggerEvent::saved(a.clone(), 1), clock.now());
    scheduler.push(TriggerEvent::saved(a.clone(), 2), clock.now());
    assert!(scheduler.complete(&a, &RunId::new()).is_empty());
    assert!(scheduler.complete(&file("other"), &first.run_id).is_empty());
    assert_eq!(scheduler.queued(&a), 1);
}

#[test]
fn configured_policies_and_stages_apply() {
    let settings = EngineSettings::default()
        .with_conflict(TriggerKind::Saved, ConflictPolicy::Supersede)
        .with_stages(TriggerKind::FocusEntered, Vec::new());
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new(settings);
    let a = file("a.py");

    let first = scheduler.push(TriggerEvent::saved(a.clone(), 1), clock.now());
    let second = scheduler.push(TriggerEvent::saved(a.clone(), 2), clock.now());
    assert_eq!(second.dispatches, [Dispatch::Cancel { file: a.clone(), run_id: first.run_id }]);

    let event = TriggerEvent::new(TriggerKind::FocusEntered, file("b.py"), 3);
    let focus = scheduler.push(event, clock.now());
    assert!(started(&focus.dispatches)[0].stages.is_empty());
}

#[test]
fn debounce_window_follows_reload() {
    let clock = FakeClock::new();
    let mut scheduler = scheduler();
    let mut def = tidy_config::EngineDef::default();
    def.quiet_window_ms = 50;
    scheduler.reload(EngineSettings::from_def(&def).unwrap());
    scheduler.push(TriggerEvent::text_changed(file("a"), 1), clock.now());
    clock.advance(Duration::from_millis(50));
    assert_eq!(started(&scheduler.tick(clock.now())).len(), 1);
}
