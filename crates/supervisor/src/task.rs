// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

//! The task wrapper: turns a bound task into a uniform callable that runs
//! under one of two in-process policies and always returns an execution
//! report.
//!
//! Policy A (one-shot) is [`run_one_shot`]; Policy B (routine) is
//! [`run_routine`], which drives Policy A once per iteration. Both are used
//! identically by the main process scheduler and by a child worker's own
//! trivial dequeue loop ([`crate::worker`]) — the scheduler differs, the
//! policy does not. Policy C (child dispatch) lives in [`crate::child`];
//! Policy D (setup-then-loop) is [`TaskBuilder::setup_then_loop`] below,
//! sugar over a single bound task that runs its setup exactly once.

use crate::brain::{BoundTask, BrainInit, TaskFn};
use cortex_core::{ConfigError, ExecutionReport, ExecutionState, TaskName, TaskSpec};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Run one invocation of `task.func`, bounded by `timeout` if given.
///
/// Spawns the call so a user panic is caught at the wrapper boundary as a
/// [`tokio::task::JoinError`] instead of unwinding the caller, and never
/// propagates to sibling tasks. Aborts the spawned task on timeout so it
/// doesn't keep running detached.
async fn invoke_once<B: Send + Sync + 'static>(
    func: TaskFn<B>,
    brain: Arc<B>,
    name: TaskName,
    timeout: Option<Duration>,
) -> ExecutionReport {
    let handle = tokio::spawn(func(brain));
    let abort = handle.abort_handle();

    let joined = match timeout {
        Some(budget) => match tokio::time::timeout(budget, handle).await {
            Ok(joined) => joined,
            Err(_elapsed) => {
                abort.abort();
                return ExecutionReport::timeout(name);
            }
        },
        None => handle.await,
    };

    match joined {
        Ok(Ok(result)) => ExecutionReport::correctly(name, result),
        Ok(Err(fault)) => {
            tracing::error!(task_name = %name, fault = %fault, "task raised an unhandled fault");
            ExecutionReport::error_occurred(name)
        }
        Err(join_error) => {
            tracing::error!(task_name = %name, error = %join_error, "task panicked");
            ExecutionReport::error_occurred(name)
        }
    }
}

/// Policy A: one-shot, main-process-or-child (the scheduler differs, the
/// policy does not).
pub async fn run_one_shot<B: Send + Sync + 'static>(
    task: &BoundTask<B>,
    brain: Arc<B>,
) -> ExecutionReport {
    invoke_once(task.func.clone(), brain, task.name().clone(), task.descriptor.timeout).await
}

/// Policy B: routine. Loops until the configured timeout elapses (if any);
/// sleeps `refresh_rate` between iterations regardless of each iteration's
/// own outcome; an ordinary iteration fault never stops the routine.
///
/// Exception: if `task.terminal` is set and reports `true` after an
/// `error_occurred` iteration, the routine stops on that report instead of
/// sleeping and retrying — this is how Policy D's setup fault ("terminate
/// the task with `error_occurred` and no loop ever runs") is distinguished
/// from an ordinary loop-body fault, which must keep iterating.
#[allow(clippy::expect_used)] // callers only reach here via run_in_process's is_routine() check
pub async fn run_routine<B: Send + Sync + 'static>(
    task: &BoundTask<B>,
    brain: Arc<B>,
) -> ExecutionReport {
    let name = task.name().clone();
    let refresh_rate = task
        .descriptor
        .refresh_rate()
        .expect("run_routine is only called on a routine descriptor");
    let deadline = task.descriptor.timeout.map(|timeout| tokio::time::Instant::now() + timeout);

    loop {
        let remaining = deadline.map(|d| d.saturating_duration_since(tokio::time::Instant::now()));
        if let Some(remaining) = remaining {
            if remaining.is_zero() {
                return ExecutionReport::timeout(name);
            }
        }

        let report = invoke_once(task.func.clone(), brain.clone(), name.clone(), remaining).await;
        if report.status == ExecutionState::Timeout {
            return report;
        }
        if report.status == ExecutionState::ErrorOccurred {
            if let Some(terminal) = &task.terminal {
                if terminal() {
                    return report;
                }
            }
        }

        tokio::time::sleep(refresh_rate).await;
    }
}

/// Dispatch a bound task to whichever of Policy A or B its descriptor
/// selects. Callers that need Policy C (child-hosted) go through
/// [`crate::child::ChildHandle`] instead — this function is for in-process
/// execution only, used both by the main-process scheduler and by a child
/// worker's own dequeue loop.
pub async fn run_in_process<B: Send + Sync + 'static>(
    task: &BoundTask<B>,
    brain: Arc<B>,
) -> ExecutionReport {
    if task.descriptor.is_routine() {
        run_routine(task, brain).await
    } else {
        run_one_shot(task, brain).await
    }
}

/// Sugar for Policy D: registers a setup step and a routine that shares
/// the setup's result, under a single
/// descriptor name so [`crate::brain::TaskCatalog::list_tasks`] still
/// reports one task.
///
/// A setup fault is cached in a shared flag the very first time it happens:
/// `tokio::sync::OnceCell::get_or_try_init` itself does *not* remember a
/// failed initialization (it would retry `setup` on every later call), so
/// without the flag a faulted setup would look like an ordinary iteration
/// fault to [`run_routine`] and keep being retried every `refresh_rate`
/// until the routine's own timeout (if any) elapsed — reporting `timeout`,
/// never `error_occurred`, and with the loop still never running. The flag
/// is exposed to `run_routine` as `BoundTask::terminal` so the very first
/// setup failure stops the routine immediately with a single
/// `error_occurred` report, matching "faults during setup terminate the
/// task with `error_occurred` and no loop ever runs".
pub struct TaskBuilder;

impl TaskBuilder {
    /// Attach a setup-then-loop task to `init`. `name`, `timeout` and
    /// `run_on_start` describe the composite task as the catalog sees it;
    /// `refresh_rate` applies only to the loop half; `define_loop_later`
    /// always implies a set `refresh_rate`.
    pub fn setup_then_loop<B, E>(
        init: BrainInit<B>,
        name: impl Into<TaskName>,
        run_on_start: bool,
        refresh_rate: Duration,
        timeout: Option<Duration>,
        setup: impl Fn(Arc<B>) -> crate::brain::BoxFuture<'static, Result<E, crate::brain::TaskFault>>
            + Send
            + Sync
            + 'static,
        loop_body: impl Fn(Arc<B>, Arc<E>) -> crate::brain::BoxFuture<'static, crate::brain::TaskOutcome>
            + Send
            + Sync
            + 'static,
    ) -> Result<BrainInit<B>, ConfigError>
    where
        B: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        let mut spec = TaskSpec::routine(name, true, run_on_start, refresh_rate).define_loop_later(true);
        if let Some(timeout) = timeout {
            spec = spec.timeout(timeout);
        }
        let descriptor = spec.build()?;

        let setup = Arc::new(setup);
        let loop_body = Arc::new(loop_body);
        let environment: Arc<tokio::sync::OnceCell<Arc<E>>> = Arc::new(tokio::sync::OnceCell::new());
        let setup_failed = Arc::new(AtomicBool::new(false));

        let func: TaskFn<B> = {
            let setup = setup.clone();
            let loop_body = loop_body.clone();
            let environment = environment.clone();
            let setup_failed = setup_failed.clone();
            Arc::new(move |brain: Arc<B>| {
                let setup = setup.clone();
                let loop_body = loop_body.clone();
                let environment = environment.clone();
                let setup_failed = setup_failed.clone();
                Box::pin(async move {
                    if setup_failed.load(Ordering::Acquire) {
                        return Err(crate::brain::TaskFault::new(
                            "setup already failed; the loop will not run",
                        ));
                    }
                    let env = match environment
                        .get_or_try_init(|| async { setup(brain.clone()).await.map(Arc::new) })
                        .await
                    {
                        Ok(env) => env.clone(),
                        Err(fault) => {
                            setup_failed.store(true, Ordering::Release);
                            return Err(fault);
                        }
                    };
                    loop_body(brain, env).await
                })
            })
        };

        let terminal: Arc<dyn Fn() -> bool + Send + Sync> = {
            let setup_failed = setup_failed.clone();
            Arc::new(move || setup_failed.load(Ordering::Acquire))
        };

        Ok(init.task_with_guard(descriptor, func, terminal))
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
