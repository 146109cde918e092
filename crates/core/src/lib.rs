// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tidy-core: data model for the tidy formatter/linter orchestrator

pub mod macros;

pub mod clock;
pub mod diagnostic;
pub mod event;
pub mod id;
pub mod plan;
pub mod policy;
pub mod report;
pub mod tool;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use diagnostic::{Diagnostic, Severity};
pub use event::{FileId, TriggerEvent, TriggerKind};
pub use id::RunId;
pub use plan::{ExecutionPlan, PlannedTool};
pub use policy::{
    ConflictPolicy, LanguagePolicy, LanguageRules, PolicyError, RollbackPolicy, SelectionMode,
};
pub use report::{ExecutionResult, ExecutionStatus, RunReport, ToolOutput};
pub use tool::{
    DiagnosticFormat, Invocation, OutputStream, ToolKind, ToolName, ToolSpec, WorkingDir,
    DEFAULT_TIMEOUT_MS,
};
