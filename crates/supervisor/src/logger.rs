// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

//! Logger contract: a level-tagged `log(message, level)` consumed by user
//! code, backed by `tracing`. [`Logger`] is intentionally a thin facade
//! with no state of its own — cloning it is free, and every clone writes
//! through the same global `tracing` subscriber.
//!
//! Logger handles are the one named exception to "no opaque values in the
//! shared store": a [`Logger`]'s [`serde::Serialize`] impl always succeeds
//! with a fixed sentinel, so it clears the serializer probe
//! ([`cortex_core::probe`]) as an opaque, proxy-safe value without actually
//! crossing a process boundary — a child gets its own independently
//! constructed `Logger`, never a marshalled one.

use serde::{Serialize, Serializer};
use std::fmt;

/// Severity of a single log call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
}

cortex_core::simple_display! {
    Level {
        Debug => "debug",
        Info => "info",
        Warning => "warning",
        Error => "error",
    }
}

/// The logger handle exposed to user `Brain` code.
#[derive(Debug, Clone, Default)]
pub struct Logger {
    target: &'static str,
}

impl Logger {
    /// `target` is the name under which this logger's lines are attributed
    /// (conventionally the `Brain` type's name).
    pub const fn new(target: &'static str) -> Self {
        Self { target }
    }

    pub fn log(&self, message: &str, level: Level) {
        match level {
            Level::Debug => tracing::debug!(target: "brain", brain = self.target, "{message}"),
            Level::Info => tracing::info!(target: "brain", brain = self.target, "{message}"),
            Level::Warning => tracing::warn!(target: "brain", brain = self.target, "{message}"),
            Level::Error => tracing::error!(target: "brain", brain = self.target, "{message}"),
        }
    }
}

impl fmt::Display for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Logger({})", self.target)
    }
}

/// Always succeeds: a logger is a sentinel, never real data.
impl Serialize for Logger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("<logger>")
    }
}

#[cfg(test)]
#[path = "logger_tests.rs"]
mod tests;
