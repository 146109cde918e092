// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;
use thiserror::Error;
use tidy_adapters::BufferError;
use tidy_core::ToolKind;

/// Errors surfaced to engine callers.
///
/// Tool failures and timeouts are never errors; they are data in the
/// [`tidy_core::RunReport`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no applicable {kind} for '{classifier}'")]
    NoApplicableTools { classifier: String, kind: ToolKind },
    #[error("language classifier must not be empty")]
    EmptyClassifier,
    #[error("buffer error: {0}")]
    Buffer(#[from] BufferError),
    #[error("no outcome within {}ms", ceiling.as_millis())]
    CeilingElapsed { ceiling: Duration },
    #[error("engine is shut down")]
    Shutdown,
}
