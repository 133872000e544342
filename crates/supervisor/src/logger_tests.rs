// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

use super::*;

#[test]
fn level_displays_lowercase() {
    assert_eq!(Level::Debug.to_string(), "debug");
    assert_eq!(Level::Warning.to_string(), "warning");
}

#[test]
fn logger_always_passes_the_serializer_probe() {
    let logger = Logger::new("test");
    assert!(cortex_core::probe(&logger));
    assert_eq!(serde_json::to_value(&logger).unwrap(), serde_json::json!("<logger>"));
}

#[test]
fn logger_is_cheap_to_clone() {
    let logger = Logger::new("test");
    let clone = logger.clone();
    assert_eq!(logger.to_string(), clone.to_string());
}
