// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tidy-adapters: process, executable lookup and buffer collaborators

pub mod buffer;
pub mod locate;
pub mod process;
pub mod subprocess;

pub use buffer::{BufferError, BufferProvider, FsBuffers, Snapshot};
pub use locate::{ExecutableLocator, LocateError, SearchPathLocator};
pub use process::{
    LocalProcessRunner, ProcessError, ProcessInput, ProcessOutput, ProcessRequest, ProcessRunner,
};

#[cfg(any(test, feature = "test-support"))]
pub use buffer::MemoryBuffers;
#[cfg(any(test, feature = "test-support"))]
pub use locate::FakeLocator;
#[cfg(any(test, feature = "test-support"))]
pub use process::{FakeProcessRunner, FakeScript, ProcessCall};
