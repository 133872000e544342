// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

//! The supervisor runtime: owns the child process, the synchronization
//! routine's lifecycle, the main-process scheduler, and exposes
//! `get_tasks()` to the host program.
//!
//! One `Supervisor<B>` is built around one running `Brain` instance, one
//! OS process, so the child pool is a single lazily-spawned [`ChildHandle`]
//! shared by every `process=true` task that `Brain` registers, not one
//! child per task name.

use crate::brain::{Brain, BoxFuture, TaskCatalog};
use crate::child::ChildHandle;
use crate::config::SupervisorConfig;
use crate::error::ChildError;
use crate::task::run_in_process;
use cortex_core::{ExecutionReport, TaskName};
use cortex_store::{InProcessTransport, Mirror, SharedStore, SyncHandle};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// The running supervisor for one `Brain` instance.
pub struct Supervisor<B: Brain> {
    catalog: Arc<TaskCatalog<B>>,
    brain: Arc<B>,
    mirror: Mirror,
    store: SharedStore,
    config: SupervisorConfig,
    /// Lazily spawned the first time a `process=true` task starts.
    child: Mutex<Option<Arc<ChildHandle>>>,
    /// This process's own sync routine, ticking the main-process [`Mirror`]
    /// against the authoritative [`SharedStore`] directly.
    sync: Mutex<Option<SyncHandle>>,
    /// The periodic task that drives `ChildHandle::sync_tick` once a child
    /// exists (the child's own mirror reconciliation is ad hoc over the
    /// wire protocol, see `crate::worker`, so it is not a [`SyncHandle`]).
    child_sync: Mutex<Option<JoinHandle<()>>>,
}

impl<B: Brain> Supervisor<B> {
    /// Build and start a supervisor around an already-assembled catalog,
    /// mirror, and store — the outputs of `BrainInit::build`.
    #[allow(clippy::expect_used)] // uncontended: no other task can see these mutexes yet
    pub fn start(
        catalog: TaskCatalog<B>,
        brain: Arc<B>,
        mirror: Mirror,
        store: SharedStore,
        config: SupervisorConfig,
    ) -> Arc<Self> {
        let supervisor = Arc::new(Self {
            catalog: Arc::new(catalog),
            brain,
            mirror: mirror.clone(),
            store: store.clone(),
            config: config.clone(),
            child: Mutex::new(None),
            sync: Mutex::new(None),
            child_sync: Mutex::new(None),
        });

        let sync_handle = SyncHandle::spawn(
            mirror,
            Arc::new(InProcessTransport::new(store)),
            supervisor.config.sync_refresh_rate,
        );
        *supervisor.sync.try_lock().expect("no other holder yet") = Some(sync_handle);

        let child_sync_handle = tokio::spawn(child_sync_loop(supervisor.clone()));
        *supervisor.child_sync.try_lock().expect("no other holder yet") = Some(child_sync_handle);

        supervisor
    }

    /// The auto-start bound tasks, as a ready-to-await sequence: the host
    /// program starts them by invoking each and awaiting them together.
    pub fn get_tasks(self: &Arc<Self>) -> Vec<BoxFuture<'static, ExecutionReport>> {
        self.catalog
            .autostart_tasks()
            .map(|task| {
                let name = task.name().clone();
                let supervisor = self.clone();
                Box::pin(async move { supervisor.run_task(&name).await }) as BoxFuture<'static, ExecutionReport>
            })
            .collect()
    }

    /// Dispatch one task by name, routing to the child process or running
    /// it in-process depending on its descriptor's `process` flag.
    pub async fn run_task(self: &Arc<Self>, name: &TaskName) -> ExecutionReport {
        let Some(task) = self.catalog.find(name.as_str()).cloned() else {
            tracing::error!(task_name = %name, "no such task registered");
            return ExecutionReport::error_occurred(name.clone());
        };

        if !task.descriptor.process {
            return run_in_process(&task, self.brain.clone()).await;
        }

        match self.ensure_child().await {
            Ok(child) => match child.run_task(name).await {
                Ok(report) => report,
                Err(error) => {
                    tracing::error!(task_name = %name, error = %error, "transport fault");
                    ExecutionReport::error_occurred(name.clone())
                }
            },
            Err(error) => {
                tracing::error!(task_name = %name, error = %error, "failed to spawn child process");
                ExecutionReport::error_occurred(name.clone())
            }
        }
    }

    async fn ensure_child(&self) -> Result<Arc<ChildHandle>, ChildError> {
        let mut guard = self.child.lock().await;
        if let Some(child) = guard.as_ref() {
            return Ok(child.clone());
        }
        let child = Arc::new(ChildHandle::spawn().await?);
        *guard = Some(child.clone());
        Ok(child)
    }

    /// Graceful shutdown: stop both synchronization routines, then ask the
    /// child (if any) to exit, waiting up to
    /// `SupervisorConfig::shutdown_grace` before force-killing it.
    pub async fn shutdown(&self) {
        if let Some(sync) = self.sync.lock().await.take() {
            sync.abort();
        }
        if let Some(child_sync) = self.child_sync.lock().await.take() {
            child_sync.abort();
        }
        if let Some(child) = self.child.lock().await.take() {
            child.shutdown(self.config.shutdown_grace).await;
        }
    }

    /// Convenience for a host program's `main`: block until Ctrl-C or (on
    /// Unix) SIGTERM, then run [`Self::shutdown`] — grounded in the
    /// teacher's own small-dedicated-fn-per-signal pattern.
    pub async fn run_until_signal(self: &Arc<Self>) {
        wait_for_shutdown_signal().await;
        self.shutdown().await;
    }

    pub fn catalog(&self) -> &Arc<TaskCatalog<B>> {
        &self.catalog
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }
}

async fn child_sync_loop<B: Brain>(supervisor: Arc<Supervisor<B>>) {
    let mut ticker = tokio::time::interval(supervisor.config.sync_refresh_rate);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let child = supervisor.child.lock().await.clone();
        if let Some(child) = child {
            if let Err(error) = child.sync_tick(&supervisor.store).await {
                tracing::warn!(%error, "child sync tick failed, will retry next tick");
            }
        }
    }
}

#[cfg(unix)]
#[allow(clippy::expect_used)] // installing a signal handler only fails if one is already installed for this kind
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};
    let mut terminate = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = terminate.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
