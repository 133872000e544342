// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

use super::*;
use crate::brain::{BoxFuture, TaskFault};
use cortex_core::TaskSpec;
use parking_lot::Mutex;

struct Counter {
    n: Mutex<i64>,
}

fn bound(descriptor_task: cortex_core::TaskDescriptor, func: TaskFn<Counter>) -> BoundTask<Counter> {
    BoundTask { descriptor: descriptor_task, func, terminal: None }
}

#[tokio::test]
async fn one_shot_returns_correctly_with_its_result() {
    let descriptor = TaskSpec::one_shot("t", false, true).build().unwrap();
    let func: TaskFn<Counter> = Arc::new(|_| Box::pin(async { Ok(Some(serde_json::json!(42))) }));
    let task = bound(descriptor, func);
    let brain = Arc::new(Counter { n: Mutex::new(0) });

    let report = run_one_shot(&task, brain).await;
    assert_eq!(report.status, ExecutionState::Correctly);
    assert_eq!(report.result, Some(serde_json::json!(42)));
    assert_eq!(report.task_name.as_str(), "t");
}

#[tokio::test]
async fn one_shot_faults_become_error_occurred() {
    let descriptor = TaskSpec::one_shot("faulty", false, true).build().unwrap();
    let func: TaskFn<Counter> =
        Arc::new(|_| Box::pin(async { Err(TaskFault::new("divide by zero")) }));
    let task = bound(descriptor, func);
    let brain = Arc::new(Counter { n: Mutex::new(0) });

    let report = run_one_shot(&task, brain).await;
    assert_eq!(report.status, ExecutionState::ErrorOccurred);
    assert_eq!(report.result, None);
}

#[tokio::test]
async fn one_shot_past_its_timeout_reports_timeout() {
    let descriptor =
        TaskSpec::one_shot("slow", false, true).timeout(std::time::Duration::from_millis(10)).build().unwrap();
    let func: TaskFn<Counter> = Arc::new(|_| {
        Box::pin(async {
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
            Ok(None)
        })
    });
    let task = bound(descriptor, func);
    let brain = Arc::new(Counter { n: Mutex::new(0) });

    let report = run_one_shot(&task, brain).await;
    assert_eq!(report.status, ExecutionState::Timeout);
}

#[tokio::test]
async fn routine_without_timeout_runs_at_least_a_few_iterations_then_is_aborted() {
    let descriptor = TaskSpec::routine("tick", false, true, std::time::Duration::from_millis(5)).build().unwrap();
    let func: TaskFn<Counter> = Arc::new(|brain: Arc<Counter>| {
        Box::pin(async move {
            *brain.n.lock() += 1;
            Ok(None)
        })
    });
    let task = bound(descriptor, func);
    let brain = Arc::new(Counter { n: Mutex::new(0) });
    let brain_for_check = brain.clone();

    let handle = tokio::spawn(async move { run_routine(&task, brain).await });
    tokio::time::sleep(std::time::Duration::from_millis(40)).await;
    handle.abort();

    assert!(*brain_for_check.n.lock() >= 3);
}

#[tokio::test]
async fn routine_with_timeout_terminates_with_timeout_and_keeps_running_after_an_iteration_fault() {
    let descriptor = TaskSpec::routine("flaky", false, true, std::time::Duration::from_millis(20))
        .timeout(std::time::Duration::from_millis(70))
        .build()
        .unwrap();
    let func: TaskFn<Counter> = Arc::new(|brain: Arc<Counter>| {
        Box::pin(async move {
            let mut n = brain.n.lock();
            *n += 1;
            if *n == 1 {
                return Err(TaskFault::new("first iteration fault"));
            }
            Ok(None)
        })
    });
    let task = bound(descriptor, func);
    let brain = Arc::new(Counter { n: Mutex::new(0) });

    let report = run_routine(&task, brain.clone()).await;
    assert_eq!(report.status, ExecutionState::Timeout);
    assert!(*brain.n.lock() >= 2);
}

#[tokio::test]
async fn setup_then_loop_shares_the_setup_environment_with_every_loop_iteration() {
    let brain = Arc::new(Counter { n: Mutex::new(0) });
    let init: BrainInit<Counter> = BrainInit::new();
    let init = TaskBuilder::setup_then_loop::<Counter, String>(
        init,
        "obj",
        true,
        std::time::Duration::from_millis(10),
        None,
        |_brain| Box::pin(async { Ok("ready".to_string()) }) as BoxFuture<'static, Result<String, TaskFault>>,
        |brain: Arc<Counter>, env: Arc<String>| {
            Box::pin(async move {
                assert_eq!(env.as_str(), "ready");
                *brain.n.lock() += 1;
                Ok(None)
            })
        },
    )
    .unwrap();
    let mirror = cortex_store::Mirror::new();
    let store = cortex_store::SharedStore::new();
    let catalog = init.build(&mirror, &store).unwrap();
    let task = catalog.find("obj").unwrap().clone();

    let handle = tokio::spawn(async move { run_in_process(&task, brain.clone()).await });
    tokio::time::sleep(std::time::Duration::from_millis(35)).await;
    handle.abort();
}

/// A faulted setup must terminate the whole task with a single
/// `error_occurred` report — setup runs exactly once, the loop body never
/// runs at all, and this holds even with no timeout configured (otherwise
/// the routine would loop forever retrying the setup).
#[tokio::test]
async fn setup_then_loop_terminates_with_error_occurred_when_setup_faults() {
    use std::sync::atomic::{AtomicI64, Ordering};

    let brain = Arc::new(Counter { n: Mutex::new(0) });
    let setup_calls = Arc::new(AtomicI64::new(0));
    let loop_calls = Arc::new(AtomicI64::new(0));
    let setup_calls_for_closure = setup_calls.clone();
    let loop_calls_for_closure = loop_calls.clone();

    let init: BrainInit<Counter> = BrainInit::new();
    let init = TaskBuilder::setup_then_loop::<Counter, String>(
        init,
        "obj",
        true,
        std::time::Duration::from_millis(5),
        None,
        move |_brain| {
            setup_calls_for_closure.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Err(TaskFault::new("setup blew up")) })
                as BoxFuture<'static, Result<String, TaskFault>>
        },
        move |_brain: Arc<Counter>, _env: Arc<String>| {
            loop_calls_for_closure.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok(None) })
        },
    )
    .unwrap();
    let mirror = cortex_store::Mirror::new();
    let store = cortex_store::SharedStore::new();
    let catalog = init.build(&mirror, &store).unwrap();
    let task = catalog.find("obj").unwrap().clone();

    let report = run_in_process(&task, brain).await;

    assert_eq!(report.status, ExecutionState::ErrorOccurred);
    assert_eq!(setup_calls.load(Ordering::SeqCst), 1, "setup must not be retried once it has faulted");
    assert_eq!(loop_calls.load(Ordering::SeqCst), 0, "the loop must never run after a setup fault");
}
