// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::path::Path;

fn sh(script: &str) -> ProcessRequest {
    ProcessRequest::new("sh", vec!["-c".to_string(), script.to_string()], std::env::temp_dir())
}

#[tokio::test]
async fn local_runner_pipes_stdin_to_stdout() {
    let output = LocalProcessRunner::new()
        .run(sh("tr a-z A-Z").input(ProcessInput::Stdin("x = 1\n".to_string())))
        .await
        .unwrap();
    assert_eq!(output.exit_code, Some(0));
    assert_eq!(output.stdout, "X = 1\n");
    assert_eq!(output.rewritten, None);
}

#[tokio::test]
async fn local_runner_rewrites_temp_input_file() {
    let request = ProcessRequest::new(
        "sh",
        vec![
            "-c".to_string(),
            "printf formatted > \"$1\"".to_string(),
            "sh".to_string(),
            "${input}".to_string(),
        ],
        std::env::temp_dir(),
    )
    .input(ProcessInput::TempFile { content: "raw".to_string(), dir: None, suffix: ".md".to_string() });
    let output = LocalProcessRunner::new().run(request).await.unwrap();
    assert_eq!(output.rewritten.as_deref(), Some("formatted"));
}

#[tokio::test]
async fn local_runner_stages_temp_input_in_requested_dir() {
    let dir = tempfile::TempDir::new().unwrap();
    let script = "case \"$1\" in */.tidy-*.py) cat \"$1\" ;; *) exit 9 ;; esac";
    let request = ProcessRequest::new(
        "sh",
        vec!["-c".to_string(), script.to_string(), "sh".to_string(), "${input}".to_string()],
        dir.path(),
    )
    .input(ProcessInput::TempFile {
        content: "x = 1\n".to_string(),
        dir: Some(dir.path().to_path_buf()),
        suffix: ".py".to_string(),
    });
    let output = LocalProcessRunner::new().run(request).await.unwrap();
    assert_eq!(output.exit_code, Some(0));
    assert_eq!(output.stdout, "x = 1\n");
    assert_eq!(output.rewritten.as_deref(), Some("x = 1\n"));
    // Removed once the run is over
    let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn local_runner_passes_env_and_cwd() {
    let dir = tempfile::tempdir().unwrap();
    let mut env = BTreeMap::new();
    env.insert("TIDY_TEST_FLAG".to_string(), "on".to_string());
    let request = ProcessRequest::new(
        "sh",
        vec!["-c".to_string(), "echo $TIDY_TEST_FLAG; pwd".to_string()],
        dir.path(),
    )
    .env(env);
    let output = LocalProcessRunner::new().run(request).await.unwrap();
    let mut lines = output.stdout.lines();
    assert_eq!(lines.next(), Some("on"));
    let cwd = Path::new(lines.next().unwrap()).canonicalize().unwrap();
    assert_eq!(cwd, dir.path().canonicalize().unwrap());
}

#[tokio::test]
async fn local_runner_reports_exit_code_and_stderr() {
    let output = LocalProcessRunner::new().run(sh("echo bad >&2; exit 2")).await.unwrap();
    assert_eq!(output.exit_code, Some(2));
    assert_eq!(output.stderr, "bad\n");
}

#[tokio::test]
async fn local_runner_times_out() {
    let err = LocalProcessRunner::new()
        .run(sh("sleep 5").timeout(Duration::from_millis(50)))
        .await
        .unwrap_err();
    assert!(matches!(err, ProcessError::TimedOut { .. }));
}

#[tokio::test]
async fn local_runner_spawn_failure() {
    let request = ProcessRequest::new("/nonexistent/black", Vec::new(), std::env::temp_dir());
    let err = LocalProcessRunner::new().run(request).await.unwrap_err();
    match err {
        ProcessError::Spawn { program, .. } => assert_eq!(program, "black"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn fake_runner_scripts_by_program_name() {
    let runner = FakeProcessRunner::new();
    runner
        .script("black", FakeScript::transform(|s| s.replace("  ", " ")))
        .script("ruff", FakeScript::output(1, "a.py:1:1: E1 bad\n", ""));

    let input = ProcessInput::Stdin("a  b".into());
    let request = ProcessRequest::new("/bin/black", Vec::new(), "/p").input(input);
    let out = runner.run(request).await.unwrap();
    assert_eq!(out.stdout, "a b");

    let out = runner.run(ProcessRequest::new("/bin/ruff", Vec::new(), "/p")).await.unwrap();
    assert_eq!(out.exit_code, Some(1));
    assert_eq!(runner.programs(), ["black", "ruff"]);
}

#[tokio::test]
async fn fake_runner_defaults_to_identity() {
    let runner = FakeProcessRunner::new();
    let out = runner
        .run(ProcessRequest::new("fmt", Vec::new(), "/p").input(ProcessInput::Stdin("same".into())))
        .await
        .unwrap();
    assert_eq!(out.stdout, "same");
    assert_eq!(runner.calls()[0].input.as_deref(), Some("same"));
}

#[tokio::test]
async fn fake_runner_transform_writes_temp_file_content() {
    let runner = FakeProcessRunner::new();
    runner.script("mdfmt", FakeScript::transform(|s| s.trim().to_string()));
    let input = ProcessInput::TempFile { content: " x ".into(), dir: None, suffix: ".md".into() };
    let request = ProcessRequest::new("mdfmt", Vec::new(), "/p").input(input);
    let out = runner.run(request).await.unwrap();
    assert_eq!(out.rewritten.as_deref(), Some("x"));
    assert!(out.stdout.is_empty());
}

#[tokio::test(start_paused = true)]
async fn fake_runner_delay_beyond_timeout_times_out() {
    let runner = FakeProcessRunner::new();
    runner.script("slow", FakeScript::identity().delay(Duration::from_secs(10)));
    let start = tokio::time::Instant::now();
    let err = runner
        .run(ProcessRequest::new("slow", Vec::new(), "/p").timeout(Duration::from_millis(200)))
        .await
        .unwrap_err();
    assert!(matches!(err, ProcessError::TimedOut { .. }));
    assert!(start.elapsed() >= Duration::from_millis(200));
    assert!(start.elapsed() < Duration::from_secs(1));
}
