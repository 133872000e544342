// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

//! Per-process local view of the shared store. Reads and writes are
//! transparent to the `Brain`'s own code; the dedicated synchronization
//! routine (see [`crate::sync`]) ferries changes between a mirror and the
//! authoritative [`crate::SharedStore`].

use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;
use std::sync::Arc;

/// Whether this mirror lives in the main process (and so may grow the
/// authoritative store with a brand-new key) or in a task's dedicated child
/// process (where an unknown key must stay local — see spec §4.5 "Adding a
/// key"). Every mirror starts `Main`; [`Mirror::mark_as_child`] flips it
/// once a process discovers it was launched as a child worker.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
enum Role {
    #[default]
    Main,
    Child,
}

#[derive(Default)]
struct MirrorState {
    values: HashMap<String, Value>,
    known_versions: HashMap<String, u64>,
    dirty: HashSet<String>,
    /// Keys that failed the serializer probe (or, in a child, are absent
    /// from the store): local to this process only, never synchronized.
    local_only: HashSet<String>,
    role: Role,
}

/// A process's local view of the shared store.
#[derive(Clone, Default)]
pub struct Mirror {
    state: Arc<RwLock<MirrorState>>,
}

impl Mirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key at its current store version, without marking it dirty —
    /// used when the dynamic initializer places an attribute in the store
    /// for the first time, or when a sync tick pulls a delta down.
    pub fn seed(&self, key: &str, value: Value, version: u64) {
        let mut state = self.state.write();
        state.values.insert(key.to_string(), value);
        state.known_versions.insert(key.to_string(), version);
    }

    /// Record a value that failed the serializer probe: kept only in this
    /// process's mirror, never pushed to the store.
    pub fn mark_local_only(&self, key: &str, value: Value) {
        let mut state = self.state.write();
        state.values.insert(key.to_string(), value);
        state.local_only.insert(key.to_string());
    }

    pub fn is_local_only(&self, key: &str) -> bool {
        self.state.read().local_only.contains(key)
    }

    /// Mark this mirror as belonging to a task's dedicated child process
    /// rather than the main process. Called once by
    /// [`crate::sync`]'s caller — in practice
    /// `cortex_supervisor::worker::run_child_worker_if_requested` — as soon
    /// as a process discovers it was launched as a child worker, before the
    /// dequeue loop starts accepting writes.
    pub fn mark_as_child(&self) {
        self.state.write().role = Role::Child;
    }

    pub fn read_raw(&self, key: &str) -> Option<Value> {
        self.state.read().values.get(key).cloned()
    }

    /// Write a value locally and, unless the key is local-only, mark it
    /// dirty for the next synchronization tick to push upstream.
    ///
    /// A child-process mirror is the one exception: writing a key it has
    /// never seen from the store (never seeded, never pulled by a sync
    /// delta) keeps the value local instead of queuing it for push, per
    /// spec §4.5 "Adding a key" — only the main process may grow the
    /// authoritative store with a brand-new name.
    pub fn write_raw(&self, key: &str, value: Value) {
        let mut state = self.state.write();
        let becomes_local_only = state.role == Role::Child
            && !state.local_only.contains(key)
            && !state.known_versions.contains_key(key);

        state.values.insert(key.to_string(), value);
        if becomes_local_only {
            state.local_only.insert(key.to_string());
        } else if !state.local_only.contains(key) {
            state.dirty.insert(key.to_string());
        }
    }

    /// Drain the set of keys locally written since the last tick, paired
    /// with their current value and the version the mirror will claim once
    /// the push is acknowledged.
    pub fn take_dirty(&self) -> Vec<(String, Value, u64)> {
        let mut state = self.state.write();
        let dirty: Vec<String> = state.dirty.drain().collect();
        dirty
            .into_iter()
            .filter_map(|key| {
                let value = state.values.get(&key)?.clone();
                let next_version = state.known_versions.get(&key).copied().unwrap_or(0) + 1;
                Some((key, value, next_version))
            })
            .collect()
    }

    pub fn known_versions(&self) -> HashMap<String, u64> {
        self.state.read().known_versions.clone()
    }

    /// Apply a batch of store -> mirror deltas (store wins; this is the
    /// "newer version" half of a sync tick).
    pub fn apply_delta(&self, entries: impl IntoIterator<Item = (String, Value, u64)>) {
        let mut state = self.state.write();
        for (key, value, version) in entries {
            let newer = match state.known_versions.get(&key) {
                Some(known) => version > *known,
                None => true,
            };
            if newer {
                state.values.insert(key.clone(), value);
                state.known_versions.insert(key, version);
            }
        }
    }

    /// Record that a push succeeded, so the key isn't re-sent next tick and
    /// its known version advances to what was just pushed.
    pub fn ack_push(&self, key: &str, version: u64) {
        self.state.write().known_versions.insert(key.to_string(), version);
    }
}

/// Typed accessor for a shared attribute, handed to `Brain` methods in
/// place of a bare field. Reads and writes go through the process's
/// [`Mirror`] — an explicit accessor for shared state, leaving the bare
/// attribute free for process-local state instead.
pub struct Shared<T> {
    mirror: Mirror,
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self { mirror: self.mirror.clone(), key: self.key.clone(), _marker: PhantomData }
    }
}

impl<T: Serialize + DeserializeOwned> Shared<T> {
    pub fn new(mirror: Mirror, key: impl Into<String>) -> Self {
        Self { mirror, key: key.into(), _marker: PhantomData }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> Option<T> {
        self.mirror.read_raw(&self.key).and_then(|v| serde_json::from_value(v).ok())
    }

    pub fn set(&self, value: T) {
        if let Ok(v) = serde_json::to_value(value) {
            self.mirror.write_raw(&self.key, v);
        }
    }
}

/// Process-local state that is never placed in the shared store — the bare
/// attribute the design note reserves for values assigned after the dynamic
/// initializer runs, or attributes that failed the serializer probe.
#[derive(Clone)]
pub struct Local<T> {
    value: Arc<RwLock<T>>,
}

impl<T: Clone> Local<T> {
    pub fn new(value: T) -> Self {
        Self { value: Arc::new(RwLock::new(value)) }
    }

    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    pub fn set(&self, value: T) {
        *self.value.write() = value;
    }
}

#[cfg(test)]
#[path = "mirror_tests.rs"]
mod tests;
