//! Bounded fan-out of download tasks with one outcome per task.
//!
//! Keeps up to `workers` fetches in flight; when one finishes the next queued
//! task starts. Fetches are blocking (libcurl) and run on the blocking pool.
//! Outcomes are recorded into the report as they complete, in completion order.

use std::any::Any;
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use super::interrupt::Interrupt;
use crate::error::FetchError;
use crate::report::BatchReport;
use crate::task::{DownloadTask, FetchOutcome};

/// Worker count when the caller gives none.
pub const DEFAULT_WORKERS: usize = 4;

/// Runs every task through `fetch` with at most `workers` in flight and
/// returns the folded report. Panics inside `fetch` become `Failed` outcomes.
///
/// When `interrupt` is requested, no new task starts; in-flight tasks finish
/// and every task that never started is reported as interrupted.
pub async fn run_batch<F>(
    tasks: Vec<DownloadTask>,
    workers: usize,
    interrupt: Option<Arc<Interrupt>>,
    fetch: Arc<F>,
) -> BatchReport
where
    F: Fn(Arc<DownloadTask>) -> FetchOutcome + Send + Sync + 'static,
{
    let workers = workers.max(1);
    let stopped = || interrupt.as_ref().is_some_and(|i| i.is_requested());
    let mut queue: VecDeque<Arc<DownloadTask>> = tasks.into_iter().map(Arc::new).collect();
    let mut report = BatchReport::default();
    tracing::info!(tasks = queue.len(), workers, "starting batch");

    if queue.len() == 1 && !stopped() {
        if let Some(task) = queue.pop_front() {
            let fallback = Arc::clone(&task);
            let outcome = tokio::task::spawn_blocking(move || run_isolated(fetch.as_ref(), task))
                .await
                .unwrap_or_else(|e| {
                    FetchOutcome::failed(fallback, None, &FetchError::WorkerAborted(e.to_string()))
                });
            report.record(outcome);
        }
        return report;
    }

    let mut join_set = tokio::task::JoinSet::new();
    loop {
        while join_set.len() < workers && !stopped() {
            let Some(task) = queue.pop_front() else {
                break;
            };
            let fetch = Arc::clone(&fetch);
            join_set.spawn_blocking(move || run_isolated(fetch.as_ref(), task));
        }

        let Some(joined) = join_set.join_next().await else {
            break;
        };
        match joined {
            Ok(outcome) => report.record(outcome),
            // run_isolated catches panics, so this only happens on runtime shutdown.
            Err(e) => tracing::error!(error = %e, "batch worker join failed"),
        }
    }

    if !queue.is_empty() {
        tracing::warn!(remaining = queue.len(), "batch interrupted, skipping unstarted tasks");
    }
    for task in queue {
        report.record(FetchOutcome::failed(task, None, &FetchError::Interrupted));
    }

    tracing::info!(
        completed = report.completed(),
        skipped = report.skipped(),
        failed = report.failed(),
        "batch finished"
    );
    report
}

fn run_isolated<F>(fetch: &F, task: Arc<DownloadTask>) -> FetchOutcome
where
    F: Fn(Arc<DownloadTask>) -> FetchOutcome,
{
    let attempt = Arc::clone(&task);
    match catch_unwind(AssertUnwindSafe(|| fetch(attempt))) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let msg = panic_message(payload.as_ref());
            tracing::error!(url = task.source_url(), panic = %msg, "fetch panicked");
            FetchOutcome::failed(task, None, &FetchError::WorkerAborted(msg))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}
