// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod config;
pub mod format;
mod input;
pub mod lint;
pub mod plan;
pub mod watch;
