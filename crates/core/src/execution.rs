// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

//! Execution state and the report a task invocation produces.

use crate::name::TaskName;
use serde::{Deserialize, Serialize};

/// Outcome of a single task invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionState {
    /// Ran to completion within any timeout, no unhandled fault.
    Correctly,
    /// Aborted because the configured timeout elapsed.
    Timeout,
    /// Aborted because the user code raised an unhandled fault.
    ErrorOccurred,
}

crate::simple_display! {
    ExecutionState {
        Correctly => "correctly",
        Timeout => "timeout",
        ErrorOccurred => "error_occurred",
    }
}

impl ExecutionState {
    pub fn is_terminal_failure(&self) -> bool {
        matches!(self, ExecutionState::Timeout | ExecutionState::ErrorOccurred)
    }
}

/// Record returned by a task invocation.
///
/// For routines, one report is produced per iteration internally; only the
/// terminal report crosses the wrapper boundary and reaches the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub status: ExecutionState,
    pub result: Option<serde_json::Value>,
    pub task_name: TaskName,
}

impl ExecutionReport {
    pub fn correctly(task_name: TaskName, result: Option<serde_json::Value>) -> Self {
        Self { status: ExecutionState::Correctly, result, task_name }
    }

    pub fn timeout(task_name: TaskName) -> Self {
        Self { status: ExecutionState::Timeout, result: None, task_name }
    }

    pub fn error_occurred(task_name: TaskName) -> Self {
        Self { status: ExecutionState::ErrorOccurred, result: None, task_name }
    }
}

#[cfg(test)]
#[path = "execution_tests.rs"]
mod tests;
