// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifiers for pipeline runs.

crate::define_id! {
    /// Unique identifier for one scheduled pipeline run.
    ///
    /// Assigned when a trigger is admitted by the scheduler, so a caller can
    /// wait on a run that is still debounced or queued behind another.
    pub struct RunId("run-");
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
