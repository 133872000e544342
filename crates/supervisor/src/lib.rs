// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cortex-supervisor: the task supervisor itself.
//!
//! A host program embeds a [`Brain`] type, builds its task catalog and
//! shared-store seed through [`BrainInit`], hands both to [`Supervisor::start`],
//! and calls [`worker::run_child_worker_if_requested`] first thing in its
//! own `main` so the binary can also serve as its own task children.

pub mod brain;
pub mod child;
pub mod config;
pub mod error;
pub mod logger;
pub mod supervisor;
pub mod task;
pub mod worker;

pub use brain::{shared, Brain, BoundTask, BoxFuture, BrainInit, TaskCatalog, TaskFault, TaskFn, TaskOutcome};
pub use child::ChildHandle;
pub use config::SupervisorConfig;
pub use error::{ChildError, ExecuteError};
pub use logger::{Level, Logger};
pub use supervisor::Supervisor;
pub use task::{run_in_process, run_one_shot, run_routine, TaskBuilder};
pub use worker::{run_child_worker_if_requested, run_worker_loop, CHILD_MARKER_ENV};
