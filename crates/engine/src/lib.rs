// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tidy-engine: rule resolution, probing, execution and trigger scheduling

mod cache;
mod coordinator;
mod diagnostics;
mod error;
mod pipeline;
mod probe;
mod resolver;
mod runtime;
mod scheduler;

pub use cache::{AvailabilityCache, ConfigFileCache};
pub use coordinator::{Coordinator, FormatRun, RunOptions};
pub use diagnostics::DiagnosticParser;
pub use error::EngineError;
pub use pipeline::{FormatSummary, OneShot, Pipeline, RunOutcome};
pub use probe::{find_project_root, find_upward, select, Prober};
pub use resolver::{classify, resolve, Resolved};
pub use runtime::{Engine, EngineDeps};
pub use scheduler::{Admission, Dispatch, RunRequest, Scheduler};
