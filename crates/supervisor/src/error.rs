// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

//! Runtime error kinds. Configuration faults live in
//! `cortex_core::ConfigError` and are fatal; everything here is recoverable
//! and normalizes into an [`cortex_core::ExecutionReport`] or a logged
//! warning rather than propagating to the host.

use cortex_core::TaskName;
use thiserror::Error;

/// A task invocation failed to produce an execution report on its own.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// The user method's task aborted without returning — a Rust panic,
    /// the nearest equivalent of user code raising an unhandled fault.
    #[error("task {0} panicked: {1}")]
    Panicked(TaskName, String),
}

/// A cross-process request to a task's dedicated child could not complete.
#[derive(Debug, Error)]
pub enum ChildError {
    #[error("failed to spawn child process: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("child transport error: {0}")]
    Protocol(#[from] cortex_wire::ProtocolError),

    #[error("child process for task {0} exited unexpectedly")]
    Dead(TaskName),

    #[error("child process returned an unexpected response")]
    UnexpectedResponse,
}
