// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

use super::*;

#[test]
fn display_matches_spec_values() {
    assert_eq!(ExecutionState::Correctly.to_string(), "correctly");
    assert_eq!(ExecutionState::Timeout.to_string(), "timeout");
    assert_eq!(ExecutionState::ErrorOccurred.to_string(), "error_occurred");
}

#[test]
fn timeout_and_error_are_terminal_failures() {
    assert!(!ExecutionState::Correctly.is_terminal_failure());
    assert!(ExecutionState::Timeout.is_terminal_failure());
    assert!(ExecutionState::ErrorOccurred.is_terminal_failure());
}

#[test]
fn report_constructors_set_expected_status() {
    let name = TaskName::new("t");
    assert_eq!(ExecutionReport::correctly(name.clone(), None).status, ExecutionState::Correctly);
    assert_eq!(ExecutionReport::timeout(name.clone()).status, ExecutionState::Timeout);
    assert_eq!(ExecutionReport::error_occurred(name).status, ExecutionState::ErrorOccurred);
}

#[test]
fn report_round_trips_through_json() {
    let report = ExecutionReport::correctly(TaskName::new("t"), Some(serde_json::json!(42)));
    let encoded = serde_json::to_string(&report).expect("serialize");
    let decoded: ExecutionReport = serde_json::from_str(&encoded).expect("deserialize");
    assert_eq!(decoded, report);
}
