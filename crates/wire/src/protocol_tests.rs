// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

use super::*;
use cortex_core::TaskName;

#[test]
fn request_round_trips_through_json() {
    let req = Request::RunTask { id: 1, task_name: TaskName::new("heartbeat") };
    let encoded = serde_json::to_string(&req).expect("serialize");
    let decoded: Request = serde_json::from_str(&encoded).expect("deserialize");
    assert_eq!(decoded, req);
}

#[test]
fn request_id_is_extracted_for_every_variant() {
    assert_eq!(Request::RunTask { id: 1, task_name: TaskName::new("t") }.id(), 1);
    assert_eq!(Request::Sync { id: 2, updates: Vec::new() }.id(), 2);
    assert_eq!(Request::Shutdown { id: 3 }.id(), 3);
}

#[test]
fn response_variants_round_trip() {
    let variants = vec![
        Response::Report { id: 1, report: cortex_core::ExecutionReport::correctly(TaskName::new("t"), None) },
        Response::SyncDelta {
            id: 2,
            entries: vec![SyncEntry { key: "x".into(), value: serde_json::json!(1), version: 3 }],
        },
        Response::ShuttingDown { id: 3 },
    ];
    for resp in variants {
        let encoded = serde_json::to_string(&resp).expect("serialize");
        let decoded: Response = serde_json::from_str(&encoded).expect("deserialize");
        assert_eq!(decoded, resp);
    }
}

#[test]
fn response_id_is_extracted_for_every_variant() {
    let report = Response::Report { id: 10, report: cortex_core::ExecutionReport::timeout(TaskName::new("t")) };
    assert_eq!(report.id(), 10);
    let delta = Response::SyncDelta { id: 11, entries: Vec::new() };
    assert_eq!(delta.id(), 11);
    assert_eq!(Response::ShuttingDown { id: 12 }.id(), 12);
}

#[test]
fn sync_request_round_trips_through_json() {
    let req = Request::Sync {
        id: 4,
        updates: vec![SyncEntry { key: "x".into(), value: serde_json::json!(1), version: 3 }],
    };
    let encoded = serde_json::to_string(&req).expect("serialize");
    let decoded: Request = serde_json::from_str(&encoded).expect("deserialize");
    assert_eq!(decoded, req);
}
