// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

//! The child worker entry point: the re-exec hook a host binary calls
//! first thing in `main()`. If this process was launched as a task's
//! dedicated child, control never returns to the host's own `main` — the
//! process becomes a trivial dequeue loop, dispatching requests from its
//! parent until told to shut down.
//!
//! `RunTask` is answered on a spawned background task rather than inline: a
//! routine with no timeout never returns, and the loop still has to keep
//! answering `Sync` requests while that routine runs so the parent's
//! synchronization tick doesn't stall against it.

use crate::brain::{Brain, TaskCatalog};
use crate::task::run_in_process;
use cortex_core::ExecutionReport;
use cortex_store::Mirror;
use cortex_wire::{read_value, write_value, Request, Response, SyncEntry};
use std::sync::Arc;
use tokio::io::{stdin, stdout, AsyncRead, AsyncWrite, BufReader};
use tokio::sync::Mutex as AsyncMutex;

/// Presence (any value) marks this process as a dedicated task child rather
/// than the host program proper.
pub const CHILD_MARKER_ENV: &str = "CORTEX_CHILD_WORKER";

/// Call this first thing in the host binary's `main`. Returns immediately
/// if this process is not a task child; otherwise runs the dequeue loop
/// and exits the process on shutdown or a closed pipe, never returning
/// control to the caller.
pub async fn run_child_worker_if_requested<B: Brain>(
    catalog: Arc<TaskCatalog<B>>,
    brain: Arc<B>,
    mirror: Mirror,
) {
    if std::env::var_os(CHILD_MARKER_ENV).is_none() {
        return;
    }
    mirror.mark_as_child();
    run_worker_loop(BufReader::new(stdin()), stdout(), catalog, brain, mirror).await;
    std::process::exit(0);
}

/// The dequeue loop itself, generic over its transport so tests can drive
/// it over an in-memory duplex pipe instead of real stdio.
pub async fn run_worker_loop<B, R, W>(
    mut input: R,
    output: W,
    catalog: Arc<TaskCatalog<B>>,
    brain: Arc<B>,
    mirror: Mirror,
) where
    B: Brain,
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let output = Arc::new(AsyncMutex::new(output));

    loop {
        let request: Request = match read_value(&mut input).await {
            Ok(request) => request,
            Err(error) => {
                tracing::warn!(%error, "child pipe closed, exiting");
                return;
            }
        };

        match request {
            Request::RunTask { id, task_name } => {
                let catalog = catalog.clone();
                let brain = brain.clone();
                let output = output.clone();
                tokio::spawn(async move {
                    let report = match catalog.find(task_name.as_str()) {
                        Some(task) => run_in_process(task, brain).await,
                        None => {
                            tracing::error!(task_name = %task_name, "child received an unregistered task name");
                            ExecutionReport::error_occurred(task_name)
                        }
                    };
                    let mut output = output.lock().await;
                    let _ = write_value(&mut *output, &Response::Report { id, report }).await;
                });
            }
            Request::Sync { id, updates } => {
                let entries = apply_and_collect(&mirror, updates);
                let mut output = output.lock().await;
                if write_value(&mut *output, &Response::SyncDelta { id, entries }).await.is_err() {
                    return;
                }
            }
            Request::Shutdown { id } => {
                let mut output = output.lock().await;
                let _ = write_value(&mut *output, &Response::ShuttingDown { id }).await;
                return;
            }
        }
    }
}

/// Apply the parent's authoritative updates to this process's mirror, then
/// drain and acknowledge everything this process has written locally since
/// the previous tick.
fn apply_and_collect(mirror: &Mirror, updates: Vec<SyncEntry>) -> Vec<SyncEntry> {
    mirror.apply_delta(updates.into_iter().map(|e| (e.key, e.value, e.version)));

    let dirty = mirror.take_dirty();
    for (key, _value, version) in &dirty {
        mirror.ack_push(key, *version);
    }
    dirty.into_iter().map(|(key, value, version)| SyncEntry { key, value, version }).collect()
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
