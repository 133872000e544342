// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

//! Task descriptor: the immutable record a builder call attaches to a
//! `Brain` method at registration time.
//!
//! Rust has no decorator or reflection layer to hang a descriptor off a
//! method at class-definition time, so registration happens through a
//! builder call in the `Brain`'s constructor instead. Declaration order is
//! simply builder-call order.

use crate::error::ConfigError;
use crate::name::TaskName;
use std::time::Duration;

/// Whether a task runs once per invocation or repeats on a fixed interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Runs exactly once per invocation (Policy A / C).
    OneShot,
    /// Runs repeatedly with `refresh_rate` sleep between iterations
    /// (Policy B / C), until cancelled or timed out.
    Routine { refresh_rate: Duration },
}

impl TaskKind {
    pub fn refresh_rate(&self) -> Option<Duration> {
        match self {
            TaskKind::OneShot => None,
            TaskKind::Routine { refresh_rate } => Some(*refresh_rate),
        }
    }

    pub fn is_routine(&self) -> bool {
        matches!(self, TaskKind::Routine { .. })
    }
}

/// Immutable record describing how a registered method should run: under
/// which process, on startup or only on demand, once or repeatedly, and
/// bounded by which timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDescriptor {
    pub name: TaskName,
    pub process: bool,
    pub run_on_start: bool,
    pub kind: TaskKind,
    pub timeout: Option<Duration>,
    pub define_loop_later: bool,
}

impl TaskDescriptor {
    pub fn refresh_rate(&self) -> Option<Duration> {
        self.kind.refresh_rate()
    }

    pub fn is_routine(&self) -> bool {
        self.kind.is_routine()
    }
}

/// Builder for [`TaskDescriptor`]. `process` and `run_on_start` are
/// constructor parameters — not optional setters — since every task must
/// pick both explicitly, with no implicit default either way.
#[derive(Debug, Clone)]
pub struct TaskSpec {
    name: TaskName,
    process: bool,
    run_on_start: bool,
    kind: TaskKind,
    timeout: Option<Duration>,
    define_loop_later: bool,
}

impl TaskSpec {
    /// A task that runs exactly once per invocation.
    pub fn one_shot(name: impl Into<TaskName>, process: bool, run_on_start: bool) -> Self {
        Self {
            name: name.into(),
            process,
            run_on_start,
            kind: TaskKind::OneShot,
            timeout: None,
            define_loop_later: false,
        }
    }

    /// A task that repeats every `refresh_rate` until cancelled or timed out.
    ///
    /// `refresh_rate` is validated (`> 0`) in [`Self::build`], not here, so
    /// the builder can still be constructed fluently before the final
    /// validation pass.
    pub fn routine(
        name: impl Into<TaskName>,
        process: bool,
        run_on_start: bool,
        refresh_rate: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            process,
            run_on_start,
            kind: TaskKind::Routine { refresh_rate },
            timeout: None,
            define_loop_later: false,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Mark this routine as setup-then-loop (Policy D).
    ///
    /// The split itself — setup prefix vs. looped suffix — is performed by
    /// the supervisor crate's `TaskBuilder::setup_then_loop`, which takes
    /// two closures instead of one; this flag only records that the
    /// resulting descriptor is a Policy D task for `list_tasks` and logging.
    pub fn define_loop_later(mut self, value: bool) -> Self {
        self.define_loop_later = value;
        self
    }

    /// Validate and produce the immutable descriptor.
    pub fn build(self) -> Result<TaskDescriptor, ConfigError> {
        if let TaskKind::Routine { refresh_rate } = self.kind {
            if refresh_rate.is_zero() {
                return Err(ConfigError::RefreshRateNotPositive);
            }
        }
        if self.define_loop_later {
            if !self.kind.is_routine() {
                return Err(ConfigError::LoopRequiresRoutine);
            }
            if !self.process {
                return Err(ConfigError::LoopRequiresChildProcess);
            }
        }
        Ok(TaskDescriptor {
            name: self.name,
            process: self.process,
            run_on_start: self.run_on_start,
            kind: self.kind,
            timeout: self.timeout,
            define_loop_later: self.define_loop_later,
        })
    }
}

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;
