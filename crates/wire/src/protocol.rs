// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

//! Request/response types exchanged between a `Brain`'s main process and its
//! dedicated child process: task dispatch and periodic mirror/store
//! synchronization.
//!
//! Every request carries a `call id` minted by the caller. A child's
//! dequeue loop answers `Sync` immediately but runs `RunTask` in the
//! background so a long-running routine (one with no timeout never returns
//! on its own) doesn't block the pipe against the synchronization tick that
//! needs to keep crossing it in the meantime; the id is how the parent
//! matches a reply back to the call that's still waiting on it.

use cortex_core::{ExecutionReport, TaskName};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sent from the parent to a child.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Run the named task under Policy C/D. The child already holds the
    /// descriptor and closure for this `Brain` — only the name crosses the
    /// wire, keeping the transport agnostic of the task's actual body.
    RunTask { id: u64, task_name: TaskName },

    /// One synchronization tick: store -> mirror updates the child doesn't
    /// have yet, carried down in the same call whose reply carries the
    /// child's pending mirror -> store writes back up.
    Sync { id: u64, updates: Vec<SyncEntry> },

    /// Forwarded as a hard process-level abort of the child's current task.
    Shutdown { id: u64 },
}

impl Request {
    pub fn id(&self) -> u64 {
        match self {
            Request::RunTask { id, .. } => *id,
            Request::Sync { id, .. } => *id,
            Request::Shutdown { id } => *id,
        }
    }
}

/// Sent from a child back to the parent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    /// One execution report per one-shot call, or the terminal report of a
    /// routine call.
    Report { id: u64, report: ExecutionReport },

    /// Reply to `Request::Sync`: every key the child's mirror has written
    /// locally since the previous tick.
    SyncDelta { id: u64, entries: Vec<SyncEntry> },

    ShuttingDown { id: u64 },
}

impl Response {
    pub fn id(&self) -> u64 {
        match self {
            Response::Report { id, .. } => *id,
            Response::SyncDelta { id, .. } => *id,
            Response::ShuttingDown { id } => *id,
        }
    }
}

/// One key's value and version, carried in either direction of a sync tick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncEntry {
    pub key: String,
    pub value: Value,
    pub version: u64,
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
