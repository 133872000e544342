// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

use super::*;
use crate::store::SharedStore;
use std::sync::atomic::{AtomicUsize, Ordering};

#[tokio::test]
async fn in_process_transport_push_writes_through_to_store() {
    let store = SharedStore::new();
    let transport = InProcessTransport::new(store.clone());
    transport
        .push(vec![("k".to_string(), serde_json::json!("v"), 1)])
        .await
        .unwrap();
    assert_eq!(store.get("k").unwrap().value, serde_json::json!("v"));
}

#[tokio::test]
async fn in_process_transport_pull_returns_only_newer_entries() {
    let store = SharedStore::new();
    store.set("a", serde_json::json!(1));
    let transport = InProcessTransport::new(store);
    let entries = transport.pull(HashMap::new()).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, "a");
}

#[tokio::test]
async fn run_tick_pushes_dirty_keys_then_acks_them() {
    let store = SharedStore::new();
    store.insert_if_absent("n", serde_json::json!(0));
    let mirror = Mirror::new();
    mirror.seed("n", serde_json::json!(0), 1);
    mirror.write_raw("n", serde_json::json!(5));

    let transport = InProcessTransport::new(store.clone());
    run_tick(&mirror, &transport).await;

    assert_eq!(store.get("n").unwrap().value, serde_json::json!(5));
    assert!(mirror.take_dirty().is_empty());
}

#[tokio::test]
async fn run_tick_pulls_newer_store_values_into_the_mirror() {
    let store = SharedStore::new();
    store.set("remote", serde_json::json!("from store"));
    let mirror = Mirror::new();
    let transport = InProcessTransport::new(store);

    run_tick(&mirror, &transport).await;

    assert_eq!(mirror.read_raw("remote"), Some(serde_json::json!("from store")));
}

struct FailingTransport {
    push_calls: AtomicUsize,
}

#[async_trait::async_trait]
impl SyncTransport for FailingTransport {
    async fn push(&self, _entries: Vec<(String, Value, u64)>) -> Result<(), SyncError> {
        self.push_calls.fetch_add(1, Ordering::SeqCst);
        Err(SyncError::Transport("connection reset".to_string()))
    }

    async fn pull(&self, _known: HashMap<String, u64>) -> Result<Vec<(String, Value, u64)>, SyncError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn a_failed_push_leaves_the_key_dirty_for_the_next_tick() {
    let mirror = Mirror::new();
    mirror.seed("k", serde_json::json!(1), 1);
    mirror.write_raw("k", serde_json::json!(2));

    let transport = FailingTransport { push_calls: AtomicUsize::new(0) };
    run_tick(&mirror, &transport).await;

    assert_eq!(transport.push_calls.load(Ordering::SeqCst), 1);
    let dirty = mirror.take_dirty();
    assert_eq!(dirty.len(), 1);
    assert_eq!(dirty[0].0, "k");
}
