// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

use super::*;
use cortex_core::TaskSpec;
use cortex_store::SharedStore;

struct Counter;

fn bump_fn() -> TaskFn<Counter> {
    Arc::new(|_brain| Box::pin(async { Ok(Some(serde_json::json!(1))) }))
}

#[test]
fn catalog_preserves_declaration_order() {
    let d1 = TaskSpec::one_shot("first", false, true).build().unwrap();
    let d2 = TaskSpec::one_shot("second", false, false).build().unwrap();
    let init: BrainInit<Counter> = BrainInit::new().task(d1, bump_fn()).task(d2, bump_fn());
    let mirror = Mirror::new();
    let store = SharedStore::new();
    let catalog = init.build(&mirror, &store).unwrap();

    let names: Vec<&str> = catalog.list_tasks().iter().map(|t| t.name().as_str()).collect();
    assert_eq!(names, vec!["first", "second"]);
}

#[test]
fn autostart_tasks_filters_to_run_on_start() {
    let d1 = TaskSpec::one_shot("auto", false, true).build().unwrap();
    let d2 = TaskSpec::one_shot("manual", false, false).build().unwrap();
    let init: BrainInit<Counter> = BrainInit::new().task(d1, bump_fn()).task(d2, bump_fn());
    let mirror = Mirror::new();
    let store = SharedStore::new();
    let catalog = init.build(&mirror, &store).unwrap();

    let names: Vec<&str> = catalog.autostart_tasks().map(|t| t.name().as_str()).collect();
    assert_eq!(names, vec!["auto"]);
}

#[test]
fn attribute_that_passes_the_probe_is_seeded_into_the_mirror_and_store() {
    let init: BrainInit<Counter> = BrainInit::new().attribute("n", &42i64);
    let mirror = Mirror::new();
    let store = SharedStore::new();
    init.build(&mirror, &store).unwrap();
    assert_eq!(mirror.read_raw("n"), Some(serde_json::json!(42)));
    assert_eq!(store.get("n").map(|v| v.value), Some(serde_json::json!(42)));
}

#[test]
fn shared_helper_reads_back_a_seeded_attribute() {
    let init: BrainInit<Counter> = BrainInit::new().attribute("x", &7i64);
    let mirror = Mirror::new();
    let store = SharedStore::new();
    init.build(&mirror, &store).unwrap();
    let handle: Shared<i64> = shared(&mirror, "x");
    assert_eq!(handle.get(), Some(7));
}
