// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

//! The synchronization routine.
//!
//! Runs at a fixed `refresh_rate` (default 10ms) in every process that has
//! mutated or read any shared key, and on each tick copies mirror writes up
//! to the authoritative store and newer store values back down. The actual
//! transport — a direct in-process call in the main process, a wire
//! round-trip to the parent in a child process — is abstracted behind
//! [`SyncTransport`] so this routine doesn't care which side of the
//! process boundary it's running on.

use crate::mirror::Mirror;
use crate::store::SharedStore;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;

/// Default synchronization tick rate.
pub const DEFAULT_SYNC_REFRESH_RATE: Duration = Duration::from_millis(10);

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("sync transport error: {0}")]
    Transport(String),
}

/// How a process reaches the authoritative store for one sync tick.
#[async_trait]
pub trait SyncTransport: Send + Sync {
    async fn push(&self, entries: Vec<(String, Value, u64)>) -> Result<(), SyncError>;
    async fn pull(
        &self,
        known_versions: HashMap<String, u64>,
    ) -> Result<Vec<(String, Value, u64)>, SyncError>;
}

/// Transport used by the main process: the store is right there, so a tick
/// is a direct map read/write with no serialization round-trip.
pub struct InProcessTransport {
    store: SharedStore,
}

impl InProcessTransport {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SyncTransport for InProcessTransport {
    async fn push(&self, entries: Vec<(String, Value, u64)>) -> Result<(), SyncError> {
        for (key, value, _version) in entries {
            self.store.set(&key, value);
        }
        Ok(())
    }

    async fn pull(
        &self,
        known_versions: HashMap<String, u64>,
    ) -> Result<Vec<(String, Value, u64)>, SyncError> {
        Ok(self
            .store
            .delta_since(&known_versions)
            .into_iter()
            .map(|(key, vv)| (key, vv.value, vv.version))
            .collect())
    }
}

/// A running synchronization routine. Dropping or calling [`Self::abort`]
/// stops it; the supervisor does this as part of shutdown.
pub struct SyncHandle {
    join: JoinHandle<()>,
}

impl SyncHandle {
    /// Spawn the routine on the current tokio runtime.
    pub fn spawn(
        mirror: Mirror,
        transport: Arc<dyn SyncTransport>,
        refresh_rate: Duration,
    ) -> Self {
        let join = tokio::spawn(run_loop(mirror, transport, refresh_rate));
        Self { join }
    }

    pub fn abort(&self) {
        self.join.abort();
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.join.abort();
    }
}

async fn run_loop(mirror: Mirror, transport: Arc<dyn SyncTransport>, refresh_rate: Duration) {
    let mut ticker = tokio::time::interval(refresh_rate);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        run_tick(&mirror, transport.as_ref()).await;
    }
}

/// One mirror <-> store reconciliation pass. Exposed separately from
/// [`run_loop`] so tests can drive individual ticks deterministically
/// instead of racing a real timer.
pub async fn run_tick(mirror: &Mirror, transport: &dyn SyncTransport) {
    let dirty = mirror.take_dirty();
    if !dirty.is_empty() {
        match transport.push(dirty.clone()).await {
            Ok(()) => {
                for (key, _value, version) in dirty {
                    mirror.ack_push(&key, version);
                }
            }
            Err(error) => {
                tracing::warn!(%error, "sync push failed, will retry next tick");
                for (key, value, _version) in dirty {
                    mirror.write_raw(&key, value);
                }
            }
        }
    }

    match transport.pull(mirror.known_versions()).await {
        Ok(entries) => mirror.apply_delta(entries),
        Err(error) => tracing::warn!(%error, "sync pull failed"),
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
