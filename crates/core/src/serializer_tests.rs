// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

use super::*;

/// Stand-in for an opaque handle (a socket, a callback, ...) that cannot be
/// serialized.
struct Opaque;

impl Probed for Opaque {
    fn to_json(&self) -> Option<serde_json::Value> {
        None
    }
}

#[test]
fn integers_and_strings_pass_the_probe() {
    assert!(probe(&42i64));
    assert!(probe(&"hello".to_string()));
    assert!(probe(&3.14f64));
}

#[test]
fn sequences_maps_and_null_pass_the_probe() {
    assert!(probe(&vec![1, 2, 3]));
    let mut map = std::collections::BTreeMap::new();
    map.insert("k".to_string(), 1);
    assert!(probe(&map));
    assert!(probe(&Option::<i32>::None));
}

#[test]
fn opaque_handle_fails_the_probe() {
    assert!(!probe(&Opaque));
}
