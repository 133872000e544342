// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

use super::*;

#[test]
fn insert_if_absent_only_succeeds_once() {
    let store = SharedStore::new();
    assert!(store.insert_if_absent("n", serde_json::json!(0)));
    assert!(!store.insert_if_absent("n", serde_json::json!(99)));
    assert_eq!(store.get("n").unwrap().value, serde_json::json!(0));
}

#[test]
fn set_bumps_version_each_write() {
    let store = SharedStore::new();
    assert_eq!(store.set("x", serde_json::json!(1)), 1);
    assert_eq!(store.set("x", serde_json::json!(2)), 2);
    assert_eq!(store.set("x", serde_json::json!(3)), 3);
    let vv = store.get("x").unwrap();
    assert_eq!(vv.value, serde_json::json!(3));
    assert_eq!(vv.version, 3);
}

#[test]
fn delta_since_returns_only_newer_keys() {
    let store = SharedStore::new();
    store.set("a", serde_json::json!(1)); // version 1
    store.set("b", serde_json::json!(1)); // version 1
    store.set("b", serde_json::json!(2)); // version 2

    let mut known = std::collections::HashMap::new();
    known.insert("a".to_string(), 1u64);
    known.insert("b".to_string(), 1u64);

    let delta = store.delta_since(&known);
    assert_eq!(delta.len(), 1);
    assert_eq!(delta[0].0, "b");
    assert_eq!(delta[0].1.version, 2);
}

#[test]
fn delta_since_includes_unknown_keys() {
    let store = SharedStore::new();
    store.set("new_key", serde_json::json!("hi"));
    let delta = store.delta_since(&std::collections::HashMap::new());
    assert_eq!(delta.len(), 1);
    assert_eq!(delta[0].0, "new_key");
}

#[test]
fn clones_share_the_same_backing_map() {
    let store = SharedStore::new();
    let clone = store.clone();
    store.set("shared", serde_json::json!(true));
    assert_eq!(clone.get("shared").unwrap().value, serde_json::json!(true));
}
