// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution with a wall-clock bound.

use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Why a bounded subprocess produced no output.
#[derive(Debug, thiserror::Error)]
pub enum SubprocessError {
    #[error("{label}: failed to spawn: {source}")]
    Spawn {
        label: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{label}: i/o error: {source}")]
    Io {
        label: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{label}: timed out after {}ms", timeout.as_millis())]
    TimedOut { label: String, timeout: Duration },
}

/// Run `cmd` to completion, killing it if it outlives `timeout`.
///
/// When `stdin` is given it is written to the child and the pipe closed;
/// otherwise the child's stdin is null. stdout and stderr are captured.
pub async fn run_with_timeout(
    mut cmd: Command,
    stdin: Option<&[u8]>,
    timeout: Duration,
    label: &str,
) -> Result<Output, SubprocessError> {
    cmd.stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .map_err(|source| SubprocessError::Spawn { label: label.to_string(), source })?;

    let pipe = child.stdin.take();
    let write = async move {
        let (Some(bytes), Some(mut pipe)) = (stdin, pipe) else {
            return Ok(());
        };
        // A tool may exit without reading its input; a broken pipe is not fatal
        match pipe.write_all(bytes).await {
            Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => Err(e),
            _ => Ok(()),
        }
    };
    let run = async move {
        let (written, output) = tokio::join!(write, child.wait_with_output());
        written?;
        output
    };

    match tokio::time::timeout(timeout, run).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(source)) => Err(SubprocessError::Io { label: label.to_string(), source }),
        Err(_) => {
            tracing::warn!(label, timeout_ms = timeout.as_millis() as u64, "subprocess timed out");
            Err(SubprocessError::TimedOut { label: label.to_string(), timeout })
        }
    }
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
