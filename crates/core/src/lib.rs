// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cortex-core: shared types for the task supervisor.
//!
//! This crate has no notion of scheduling or process boundaries; it only
//! defines the data model a `Brain` and its supervisor exchange: execution
//! states and reports, task descriptors, and the serializer probe.

pub mod descriptor;
pub mod error;
pub mod execution;
pub mod macros;
pub mod name;
pub mod serializer;

pub use descriptor::{TaskDescriptor, TaskKind, TaskSpec};
pub use error::ConfigError;
pub use execution::{ExecutionReport, ExecutionState};
pub use name::TaskName;
pub use serializer::{probe, warn_unserializable, Probed};
