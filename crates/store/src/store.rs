// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

//! The authoritative shared store.
//!
//! Lives in the main process. Every process may read or write any key
//! through its own [`crate::Mirror`]; this type is the thing the
//! synchronization routine reconciles mirrors against. Conflict policy is
//! last-writer-wins per key at tick granularity, broken by a per-key
//! monotonic version counter.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A stored value together with the version it was written at.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedValue {
    pub value: Value,
    pub version: u64,
}

/// The cross-process key/value mapping of a `Brain`'s serializable public
/// attributes.
///
/// Cheaply cloneable; every clone shares the same backing map.
#[derive(Clone, Default)]
pub struct SharedStore {
    inner: Arc<RwLock<HashMap<String, VersionedValue>>>,
}

impl SharedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key that isn't present yet, at version 1. Used when a
    /// mirror writes a name the dynamic initializer never registered.
    /// Returns `false` if the key already exists.
    pub fn insert_if_absent(&self, key: &str, value: Value) -> bool {
        let mut guard = self.inner.write();
        if guard.contains_key(key) {
            return false;
        }
        guard.insert(key.to_string(), VersionedValue { value, version: 1 });
        true
    }

    /// Overwrite `key`, bumping its version. Returns the new version.
    pub fn set(&self, key: &str, value: Value) -> u64 {
        let mut guard = self.inner.write();
        let version = guard.get(key).map(|v| v.version + 1).unwrap_or(1);
        guard.insert(key.to_string(), VersionedValue { value, version });
        version
    }

    pub fn get(&self, key: &str) -> Option<VersionedValue> {
        self.inner.read().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.read().contains_key(key)
    }

    /// Every key whose version is newer than what the caller already knows,
    /// for the store -> mirror half of a synchronization tick.
    pub fn delta_since(&self, known_versions: &HashMap<String, u64>) -> Vec<(String, VersionedValue)> {
        self.inner
            .read()
            .iter()
            .filter(|(key, vv)| match known_versions.get(*key) {
                Some(known) => vv.version > *known,
                None => true,
            })
            .map(|(key, vv)| (key.clone(), vv.clone()))
            .collect()
    }

    /// A full snapshot, e.g. for a child that just started and has no
    /// known versions yet.
    pub fn snapshot(&self) -> HashMap<String, VersionedValue> {
        self.inner.read().clone()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
