// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process execution primitive for external tools.

use crate::subprocess::{run_with_timeout, SubprocessError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Placeholder replaced by the temporary input file path.
pub const INPUT_PLACEHOLDER: &str = "${input}";

/// Errors from process operations
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to spawn {program}: {message}")]
    Spawn { program: String, message: String },
    #[error("{program} timed out after {}ms", timeout.as_millis())]
    TimedOut { program: String, timeout: Duration },
    #[error("{program}: {message}")]
    Io { program: String, message: String },
    #[error("temporary input file: {0}")]
    TempFile(#[source] std::io::Error),
}

/// How buffer content reaches the tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProcessInput {
    #[default]
    None,
    Stdin(String),
    /// Written to a temporary file bound to `${input}` and read back on exit
    TempFile {
        content: String,
        /// Directory to create the file in (defaults to the system temp dir)
        dir: Option<PathBuf>,
        /// File name suffix, e.g. `.py`, so tools can infer the language
        suffix: String,
    },
}

/// One tool invocation.
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub env: BTreeMap<String, String>,
    pub input: ProcessInput,
    pub timeout: Duration,
}

impl ProcessRequest {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: cwd.into(),
            env: BTreeMap::new(),
            input: ProcessInput::None,
            timeout: Duration::from_millis(tidy_core::DEFAULT_TIMEOUT_MS),
        }
    }

    tidy_core::setters! {
        set {
            env: BTreeMap<String, String>,
            input: ProcessInput,
            timeout: Duration,
        }
    }

    /// Program name for logs and fake lookup.
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// Temporary input file content after exit, for [`ProcessInput::TempFile`]
    pub rewritten: Option<String>,
}

/// Adapter for running external tools
#[async_trait]
pub trait ProcessRunner: Clone + Send + Sync + 'static {
    async fn run(&self, request: ProcessRequest) -> Result<ProcessOutput, ProcessError>;
}

/// Runs tools as local child processes.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalProcessRunner;

impl LocalProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for LocalProcessRunner {
    async fn run(&self, request: ProcessRequest) -> Result<ProcessOutput, ProcessError> {
        let program = request.program_name();

        // Held until the process exits; removed on drop
        let temp = match &request.input {
            ProcessInput::TempFile { content, dir, suffix } => {
                Some(stage_input(content, dir.clone(), suffix.clone()).await?)
            }
            _ => None,
        };

        let args: Vec<String> = match &temp {
            Some(file) => {
                let path = file.path().display().to_string();
                request.args.iter().map(|a| a.replace(INPUT_PLACEHOLDER, &path)).collect()
            }
            None => request.args.clone(),
        };

        let mut cmd = tokio::process::Command::new(&request.program);
        cmd.args(&args).current_dir(&request.cwd).envs(&request.env);

        let stdin = match &request.input {
            ProcessInput::Stdin(content) => Some(content.as_bytes()),
            _ => None,
        };

        tracing::debug!(%program, ?args, cwd = %request.cwd.display(), "spawning tool");
        let output = run_with_timeout(cmd, stdin, request.timeout, &program).await.map_err(
            |e| match e {
                SubprocessError::Spawn { source, .. } => {
                    ProcessError::Spawn { program: program.clone(), message: source.to_string() }
                }
                SubprocessError::Io { source, .. } => {
                    ProcessError::Io { program: program.clone(), message: source.to_string() }
                }
                SubprocessError::TimedOut { timeout, .. } => {
                    ProcessError::TimedOut { program: program.clone(), timeout }
                }
            },
        )?;

        let rewritten = match &temp {
            Some(file) => {
                Some(tokio::fs::read_to_string(file.path()).await.map_err(ProcessError::TempFile)?)
            }
            None => None,
        };

        Ok(ProcessOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            rewritten,
        })
    }
}

/// Create the `${input}` file and write `content` to it.
async fn stage_input(
    content: &str,
    dir: Option<PathBuf>,
    suffix: String,
) -> Result<tempfile::NamedTempFile, ProcessError> {
    let file = tokio::task::spawn_blocking(move || {
        let mut builder = tempfile::Builder::new();
        builder.prefix(".tidy-").suffix(&suffix);
        match dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
    })
    .await
    .map_err(|e| ProcessError::TempFile(std::io::Error::other(e)))?
    .map_err(ProcessError::TempFile)?;
    tokio::fs::write(file.path(), content).await.map_err(ProcessError::TempFile)?;
    Ok(file)
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{ProcessError, ProcessInput, ProcessOutput, ProcessRequest, ProcessRunner};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;

    type Transform = Arc<dyn Fn(&str) -> String + Send + Sync>;

    #[derive(Clone)]
    enum Behavior {
        /// Rewrite the input (stdout, or the temp file for `${input}` tools)
        Transform(Transform),
        /// Fixed output regardless of input
        Output { exit_code: i32, stdout: String, stderr: String },
        SpawnError(String),
    }

    /// Scripted response for one program.
    #[derive(Clone)]
    pub struct FakeScript {
        behavior: Behavior,
        delay: Duration,
    }

    impl FakeScript {
        /// Formatter that echoes its input unchanged.
        pub fn identity() -> Self {
            Self::transform(|s: &str| s.to_string())
        }

        pub fn transform(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
            Self { behavior: Behavior::Transform(Arc::new(f)), delay: Duration::ZERO }
        }

        pub fn output(
            exit_code: i32,
            stdout: impl Into<String>,
            stderr: impl Into<String>,
        ) -> Self {
            Self {
                behavior: Behavior::Output {
                    exit_code,
                    stdout: stdout.into(),
                    stderr: stderr.into(),
                },
                delay: Duration::ZERO,
            }
        }

        /// Non-zero exit with a stderr message.
        pub fn fail(exit_code: i32, stderr: impl Into<String>) -> Self {
            Self::output(exit_code, "", stderr)
        }

        pub fn spawn_error(message: impl Into<String>) -> Self {
            Self { behavior: Behavior::SpawnError(message.into()), delay: Duration::ZERO }
        }

        /// Sleep before responding (use with a paused tokio clock).
        pub fn delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    /// Recorded invocation
    #[derive(Debug, Clone)]
    pub struct ProcessCall {
        pub program: String,
        pub args: Vec<String>,
        pub cwd: PathBuf,
        pub input: Option<String>,
        pub timeout: Duration,
    }

    #[derive(Default)]
    struct FakeProcessState {
        scripts: HashMap<String, FakeScript>,
        calls: Vec<ProcessCall>,
    }

    /// Fake process runner keyed by program file name.
    ///
    /// Unscripted programs behave as [`FakeScript::identity`].
    #[derive(Clone, Default)]
    pub struct FakeProcessRunner {
        inner: Arc<Mutex<FakeProcessState>>,
    }

    impl FakeProcessRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn script(&self, program: &str, script: FakeScript) -> &Self {
            self.inner.lock().scripts.insert(program.to_string(), script);
            self
        }

        /// Get all recorded invocations
        pub fn calls(&self) -> Vec<ProcessCall> {
            self.inner.lock().calls.clone()
        }

        /// Programs invoked, in call order
        pub fn programs(&self) -> Vec<String> {
            self.inner.lock().calls.iter().map(|c| c.program.clone()).collect()
        }

        pub fn call_count(&self, program: &str) -> usize {
            self.inner.lock().calls.iter().filter(|c| c.program == program).count()
        }
    }

    #[async_trait]
    impl ProcessRunner for FakeProcessRunner {
        async fn run(&self, request: ProcessRequest) -> Result<ProcessOutput, ProcessError> {
            let program = request.program_name();
            let input = match &request.input {
                ProcessInput::None => None,
                ProcessInput::Stdin(content) | ProcessInput::TempFile { content, .. } => {
                    Some(content.clone())
                }
            };
            let script = {
                let mut state = self.inner.lock();
                state.calls.push(ProcessCall {
                    program: program.clone(),
                    args: request.args.clone(),
                    cwd: request.cwd.clone(),
                    input: input.clone(),
                    timeout: request.timeout,
                });
                state.scripts.get(&program).cloned().unwrap_or_else(FakeScript::identity)
            };

            if !script.delay.is_zero() {
                if script.delay > request.timeout {
                    tokio::time::sleep(request.timeout).await;
                    return Err(ProcessError::TimedOut { program, timeout: request.timeout });
                }
                tokio::time::sleep(script.delay).await;
            }

            match script.behavior {
                Behavior::SpawnError(message) => Err(ProcessError::Spawn { program, message }),
                Behavior::Output { exit_code, stdout, stderr } => Ok(ProcessOutput {
                    exit_code: Some(exit_code),
                    stdout,
                    stderr,
                    rewritten: None,
                }),
                Behavior::Transform(f) => {
                    let content = input.unwrap_or_default();
                    let result = f(&content);
                    let temp = matches!(request.input, ProcessInput::TempFile { .. });
                    Ok(ProcessOutput {
                        exit_code: Some(0),
                        stdout: if temp { String::new() } else { result.clone() },
                        stderr: String::new(),
                        rewritten: temp.then_some(result),
                    })
                }
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeProcessRunner, FakeScript, ProcessCall};

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
