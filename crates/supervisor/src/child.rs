// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

//! Policy C: dispatching a task to its Brain's dedicated child process. One
//! child process is spawned lazily, the first time a `process=true` task
//! starts, and reused by every `process=true` task that `Brain` registers.
//!
//! Transport is a length-prefixed JSON framing (`cortex_wire::codec`) over
//! the child's stdin/stdout — a pair of anonymous pipes is enough for a
//! one-`Brain`-one-child relationship, so there's no need for a socket
//! listener that fans in multiple clients.
//!
//! A call that dispatches a routine with no timeout never returns on its
//! own, so the request/response cycle can't simply lock the pipe for the
//! call's whole lifetime — `sync_tick` needs to keep crossing it every
//! `sync_refresh_rate` regardless. Outbound writes are serialized behind a
//! mutex, preserving per-child request ordering, but reads run on a
//! dedicated background task that demultiplexes replies by call id and
//! hands each to whichever caller is still waiting on it.

use crate::error::ChildError;
use crate::worker::CHILD_MARKER_ENV;
use cortex_core::{ExecutionReport, TaskName};
use cortex_wire::{read_value, write_value, Request, Response, SyncEntry};
use std::collections::HashMap;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{BufReader, BufWriter};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;

type PendingCalls = Arc<Mutex<HashMap<u64, oneshot::Sender<Response>>>>;

/// A running child process dedicated to one `Brain`, plus the framed pipe
/// connection used to talk to it.
pub struct ChildHandle {
    child: Mutex<Child>,
    stdin: Mutex<BufWriter<ChildStdin>>,
    next_id: AtomicU64,
    pending: PendingCalls,
    reader: JoinHandle<()>,
    /// What the child is known to have already received, so the next sync
    /// tick only ships the delta.
    known_versions: Mutex<HashMap<String, u64>>,
}

impl ChildHandle {
    /// Re-exec the current binary with [`CHILD_MARKER_ENV`] set, so
    /// [`crate::worker::run_child_worker_if_requested`] diverts it into the
    /// dequeue loop instead of running the host's own `main`.
    #[allow(clippy::expect_used)] // stdin/stdout are always Some: Stdio::piped() was just set above
    pub async fn spawn() -> Result<Self, ChildError> {
        let exe = std::env::current_exe().map_err(ChildError::Spawn)?;
        let mut command = Command::new(exe);
        command
            .env(CHILD_MARKER_ENV, "1")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(ChildError::Spawn)?;
        let stdin = child.stdin.take().expect("spawned with piped stdin");
        let stdout = child.stdout.take().expect("spawned with piped stdout");

        let pending: PendingCalls = Arc::new(Mutex::new(HashMap::new()));
        let reader = tokio::spawn(read_responses(BufReader::new(stdout), pending.clone()));

        Ok(Self {
            child: Mutex::new(child),
            stdin: Mutex::new(BufWriter::new(stdin)),
            next_id: AtomicU64::new(1),
            pending,
            reader,
            known_versions: Mutex::new(HashMap::new()),
        })
    }

    /// Issue one call: mint an id, register where its reply should go, write
    /// the request, then wait for the reader task to hand the matching
    /// response back. Concurrent calls interleave freely; each gets its own
    /// reply regardless of how long another call's request has been
    /// outstanding.
    async fn call(&self, build: impl FnOnce(u64) -> Request) -> Result<Response, ChildError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id, tx);

        let request = build(id);
        let write_result = {
            let mut stdin = self.stdin.lock().await;
            write_value(&mut *stdin, &request).await
        };
        if let Err(error) = write_result {
            self.pending.lock().await.remove(&id);
            return Err(error.into());
        }

        rx.await.map_err(|_| ChildError::Dead(request_task_name(&request)))
    }

    /// Dispatch one Policy C/D invocation and await its terminal report.
    pub async fn run_task(&self, task_name: &TaskName) -> Result<ExecutionReport, ChildError> {
        let name = task_name.clone();
        match self.call(move |id| Request::RunTask { id, task_name: name }).await {
            Ok(Response::Report { report, .. }) => Ok(report),
            Ok(_) => Err(ChildError::UnexpectedResponse),
            Err(error) => {
                tracing::error!(task_name = %task_name, error = %error, "transport fault dispatching to child");
                Err(error)
            }
        }
    }

    /// One synchronization tick against this child: ship every
    /// authoritative update the child doesn't have yet, fold the child's
    /// own pending writes back into the authoritative store.
    pub async fn sync_tick(&self, store: &cortex_store::SharedStore) -> Result<(), ChildError> {
        let updates: Vec<SyncEntry> = {
            let known = self.known_versions.lock().await;
            store
                .delta_since(&known)
                .into_iter()
                .map(|(key, vv)| SyncEntry { key, value: vv.value, version: vv.version })
                .collect()
        };

        let updates_for_call = updates.clone();
        match self.call(move |id| Request::Sync { id, updates: updates_for_call }).await? {
            Response::SyncDelta { entries, .. } => {
                let mut known = self.known_versions.lock().await;
                for entry in &updates {
                    known.insert(entry.key.clone(), entry.version);
                }
                for entry in entries {
                    let version = store.set(&entry.key, entry.value);
                    known.insert(entry.key, version);
                }
                Ok(())
            }
            _ => Err(ChildError::UnexpectedResponse),
        }
    }

    /// Ask the child to exit, waiting up to `grace` before forcibly killing
    /// it.
    pub async fn shutdown(&self, grace: Duration) {
        let _ = self.call(|id| Request::Shutdown { id }).await;
        self.reader.abort();
        let mut child = self.child.lock().await;
        if tokio::time::timeout(grace, child.wait()).await.is_err() {
            tracing::warn!("child did not exit within the grace period, killing");
            let _ = child.start_kill();
            let _ = child.wait().await;
        }
    }
}

impl Drop for ChildHandle {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

fn request_task_name(request: &Request) -> TaskName {
    match request {
        Request::RunTask { task_name, .. } => task_name.clone(),
        Request::Sync { .. } => TaskName::new("<sync>"),
        Request::Shutdown { .. } => TaskName::new("<shutdown>"),
    }
}

/// Background reader: one pass per incoming response, demultiplexed to
/// whichever call is waiting on its id. Exits (dropping every still-pending
/// call's sender, which fails those callers' `rx.await`) the moment the pipe
/// closes — a dead or killed child surfaces as a transport fault to every
/// caller still waiting on it.
async fn read_responses(mut stdout: BufReader<ChildStdout>, pending: PendingCalls) {
    loop {
        let response: Response = match read_value(&mut stdout).await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(%error, "child transport closed, failing calls still in flight");
                pending.lock().await.clear();
                return;
            }
        };
        if let Some(tx) = pending.lock().await.remove(&response.id()) {
            let _ = tx.send(response);
        }
    }
}

#[cfg(test)]
#[path = "child_tests.rs"]
mod tests;
