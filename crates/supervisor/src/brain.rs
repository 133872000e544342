// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

//! The `Brain` contract and the dynamic initializer.
//!
//! Rust has no class-definition-time decorator and no runtime attribute
//! introspection, so registration happens through [`BrainInit`], a builder
//! consumed at the end of the user's constructor instead.

use cortex_core::{ConfigError, TaskDescriptor, TaskName};
use cortex_store::{Mirror, Shared};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed, type-erased future — the closest static equivalent of "whatever
/// the user's method body awaits".
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What a task invocation produced, before it is wrapped into an
/// [`cortex_core::ExecutionReport`]: either a result value or the user
/// fault that aborted it.
pub type TaskOutcome = Result<Option<serde_json::Value>, TaskFault>;

/// An unhandled fault raised by user task code.
#[derive(Debug, Clone)]
pub struct TaskFault(pub String);

impl std::fmt::Display for TaskFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for TaskFault {}

impl TaskFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// The type-erased callable a [`BrainInit::task`] call attaches to a
/// descriptor.
pub type TaskFn<B> = Arc<dyn Fn(Arc<B>) -> BoxFuture<'static, TaskOutcome> + Send + Sync>;

/// A descriptor plus the instance and closure the wrapper calls
/// bound task.
#[derive(Clone)]
pub struct BoundTask<B> {
    pub descriptor: TaskDescriptor,
    pub(crate) func: TaskFn<B>,
    /// Consulted by [`crate::task::run_routine`] after an iteration that
    /// reports `error_occurred`: if present and it returns `true`, the
    /// routine stops on that report instead of sleeping and retrying.
    /// `None` for every ordinary routine, preserving "an iteration fault
    /// never stops the routine"; set by
    /// [`crate::task::TaskBuilder::setup_then_loop`] so a setup fault
    /// — which is not an ordinary iteration fault — terminates the whole
    /// task instead of being retried every tick.
    pub(crate) terminal: Option<Arc<dyn Fn() -> bool + Send + Sync>>,
}

impl<B> BoundTask<B> {
    pub fn name(&self) -> &TaskName {
        &self.descriptor.name
    }
}

/// Per-`Brain`-instance, declaration-ordered catalog of bound tasks.
#[derive(Clone)]
pub struct TaskCatalog<B> {
    tasks: Vec<BoundTask<B>>,
}

impl<B> TaskCatalog<B> {
    /// The bound tasks in declaration order.
    pub fn list_tasks(&self) -> &[BoundTask<B>] {
        &self.tasks
    }

    /// The subset flagged `run_on_start`.
    pub fn autostart_tasks(&self) -> impl Iterator<Item = &BoundTask<B>> {
        self.tasks.iter().filter(|t| t.descriptor.run_on_start)
    }

    pub fn find(&self, name: &str) -> Option<&BoundTask<B>> {
        self.tasks.iter().find(|t| t.descriptor.name == *name)
    }
}

/// Marker trait for a user-defined application object.
///
/// The trait itself requires nothing: the supervisor only sees attributes
/// and methods registered through [`BrainInit`], never anything it would
/// have to discover through methods the trait demands.
pub trait Brain: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Brain for T {}

/// Builder that assembles a `Brain`'s task catalog and partitions its
/// public attributes into shared-store and process-local state
///
/// Usage: a user constructor calls `.task(...)` and `.attribute(...)` any
/// number of times, then `.build()` once, handing back the catalog and a
/// [`Mirror`] already seeded with every registered attribute.
pub struct BrainInit<B> {
    tasks: Vec<BoundTask<B>>,
    pending_attributes: Vec<(String, serde_json::Value)>,
}

impl<B> Default for BrainInit<B> {
    fn default() -> Self {
        Self { tasks: Vec::new(), pending_attributes: Vec::new() }
    }
}

impl<B> BrainInit<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task under `descriptor`, calling `func` on invocation.
    pub fn task(mut self, descriptor: TaskDescriptor, func: TaskFn<B>) -> Self {
        self.tasks.push(BoundTask { descriptor, func, terminal: None });
        self
    }

    /// Register a task with an extra `terminal` guard consulted by
    /// [`crate::task::run_routine`] — see [`BoundTask::terminal`]. Used by
    /// [`crate::task::TaskBuilder::setup_then_loop`]; not part of the
    /// public registration surface since only a Policy D task needs it.
    pub(crate) fn task_with_guard(
        mut self,
        descriptor: TaskDescriptor,
        func: TaskFn<B>,
        terminal: Arc<dyn Fn() -> bool + Send + Sync>,
    ) -> Self {
        self.tasks.push(BoundTask { descriptor, func, terminal: Some(terminal) });
        self
    }

    /// Register a public attribute as a candidate for the shared store
    /// Call this *before* `.build()` for anything
    /// the user would otherwise assign before the dynamic initializer runs
    /// in the original design — attributes assigned afterward stay in a
    /// process-local [`cortex_store::Local`] the host keeps itself.
    ///
    /// Runs the serializer probe immediately: a value that fails is logged
    /// Logged and silently dropped from this call (the caller
    /// keeps it in a `Local` instead, never routed through the store).
    #[allow(clippy::expect_used)] // serde_json::to_value on the same value the probe just ran on
    pub fn attribute<T: Serialize + Send + Sync + 'static>(
        mut self,
        name: impl Into<String>,
        value: &T,
    ) -> Self {
        let name = name.into();
        match cortex_core::probe(value) {
            true => {
                let json = serde_json::to_value(value).expect("probe already validated this value");
                self.pending_attributes.push((name, json));
            }
            false => cortex_core::warn_unserializable(&name),
        }
        self
    }

    /// Finalize: seed both `store` (the authoritative map, created once per
    /// `Brain` before any child process forks) and `mirror`
    /// (this process's own view of it) with every registered attribute at
    /// version 1, then return the declaration-ordered catalog.
    pub fn build(
        self,
        mirror: &Mirror,
        store: &cortex_store::SharedStore,
    ) -> Result<TaskCatalog<B>, ConfigError> {
        for (name, value) in self.pending_attributes {
            store.insert_if_absent(&name, value.clone());
            mirror.seed(&name, value, 1);
        }
        Ok(TaskCatalog { tasks: self.tasks })
    }
}

/// Convenience for pulling a typed attribute out of a mirror right after
/// `BrainInit::build`, for `Brain` types that want a `Shared<T>` field
/// rather than re-deriving the key string everywhere.
pub fn shared<T: Serialize + DeserializeOwned>(mirror: &Mirror, key: impl Into<String>) -> Shared<T> {
    Shared::new(mirror.clone(), key)
}

#[cfg(test)]
#[path = "brain_tests.rs"]
mod tests;
