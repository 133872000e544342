// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

//! Configuration faults.
//!
//! These are the only error kind that is fatal and surfaced immediately to
//! the host — everything else (user faults, timeouts, serialization
//! warnings, transport faults) is recoverable and reported through an
//! [`crate::ExecutionReport`] or a log line instead.

use thiserror::Error;

/// A descriptor failed one of its construction invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `refresh_rate` was zero; routines must have a strictly positive rate.
    #[error("refresh_rate must be strictly greater than zero")]
    RefreshRateNotPositive,

    /// `define_loop_later` was requested on a one-shot task.
    #[error("define_loop_later requires a routine (refresh_rate must be set)")]
    LoopRequiresRoutine,

    /// `define_loop_later` was requested on a main-process task.
    #[error("define_loop_later is only legal for child-process routines")]
    LoopRequiresChildProcess,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
