// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-pipeline context: the cancellation signal plus worker bookkeeping.
//!
//! Every constructor in [`crate::engine`] takes a `&PipelineContext`. Workers spawned
//! through it receive only a [`CancellationObserver`]; the ability to cancel stays
//! with whoever holds the context (the caller, `take`, or a deadline). Each pipeline
//! gets its own context, so independent pipelines never interfere.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio_util::task::TaskTracker;

use crate::observability::messages::pipeline::{CancellationTriggered, DeadlineScheduled};
use crate::observability::messages::worker::{WorkerExited, WorkerFailed, WorkerSpawned};
use crate::observability::messages::StructuredLog;
use crate::signal::{CancelOnDrop, CancellationObserver, CancellationSignal};

/// Cancellation reason recorded by [`PipelineContext::cancel_after`].
pub const DEADLINE_REASON: &str = "deadline";

/// What a worker does inside the pipeline. Used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerRole {
    Generator,
    Stage,
    /// Stage replica started by fan-out, with its index.
    Replica(usize),
    Relay,
    Coordinator,
    Take,
    Deadline,
}

impl Display for WorkerRole {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            WorkerRole::Generator => write!(f, "generator"),
            WorkerRole::Stage => write!(f, "stage"),
            WorkerRole::Replica(index) => write!(f, "replica[{}]", index),
            WorkerRole::Relay => write!(f, "relay"),
            WorkerRole::Coordinator => write!(f, "coordinator"),
            WorkerRole::Take => write!(f, "take"),
            WorkerRole::Deadline => write!(f, "deadline"),
        }
    }
}

/// Shared state of one pipeline. Cheap to clone.
#[derive(Clone, Debug)]
pub struct PipelineContext {
    name: Arc<str>,
    signal: CancellationSignal,
    reason: Arc<OnceLock<&'static str>>,
    workers: TaskTracker,
    next_worker_id: Arc<AtomicU64>,
}

impl PipelineContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Arc::from(name.into()),
            signal: CancellationSignal::new(),
            reason: Arc::new(OnceLock::new()),
            workers: TaskTracker::new(),
            next_worker_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owner handle of the pipeline's signal.
    pub fn signal(&self) -> &CancellationSignal {
        &self.signal
    }

    pub fn observer(&self) -> CancellationObserver {
        self.signal.observer()
    }

    /// Cancel the pipeline, recording `reason` if this is the first request.
    ///
    /// Returns `true` only for the call that moved the signal to `Cancelled`.
    pub fn cancel(&self, reason: &'static str) -> bool {
        let _ = self.reason.set(reason);
        let first = self.signal.cancel();
        if first {
            CancellationTriggered {
                pipeline: &self.name,
                reason: self.cancel_reason().unwrap_or(reason),
            }
            .log();
        }
        first
    }

    pub fn is_cancelled(&self) -> bool {
        self.signal.is_cancelled()
    }

    /// Whether cancellation stopped any worker before it finished on its own.
    pub fn interrupted_work(&self) -> bool {
        self.signal.interrupted_work()
    }

    /// Reason given by the first [`cancel`](Self::cancel) call, if any.
    pub fn cancel_reason(&self) -> Option<&'static str> {
        self.reason.get().copied()
    }

    /// Guard that cancels the pipeline when the owning scope ends.
    pub fn cancel_on_drop(&self) -> CancelOnDrop {
        self.signal.cancel_on_drop()
    }

    /// Cancel the pipeline once `after` has elapsed, unless it is cancelled sooner.
    pub fn cancel_after(&self, after: Duration) {
        DeadlineScheduled {
            pipeline: &self.name,
            after,
        }
        .log();

        let owner = self.clone();
        let observer = self.observer();
        self.spawn_worker(WorkerRole::Deadline, async move {
            tokio::select! {
                biased;
                _ = observer.cancelled() => {}
                _ = tokio::time::sleep(after) => {
                    owner.cancel(DEADLINE_REASON);
                }
            }
        });
    }

    /// Workers spawned through this context that have not finished yet.
    pub fn live_workers(&self) -> usize {
        self.workers.len()
    }

    /// Wait up to `grace` for every worker to finish. Returns whether they did.
    pub async fn wait_for_workers(&self, grace: Duration) -> bool {
        self.workers.close();
        let drained = tokio::time::timeout(grace, self.workers.wait()).await.is_ok();
        self.workers.reopen();
        drained
    }

    /// Run `work` as a tracked worker task on the tokio runtime.
    ///
    /// Must be called from within a runtime. A panic inside `work` ends the task;
    /// everything it owns, including its stream writer, is dropped on the way out,
    /// so its output stream still closes.
    pub(crate) fn spawn_worker<F>(&self, role: WorkerRole, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let guard = WorkerGuard {
            pipeline: Arc::clone(&self.name),
            role,
            worker_id: self.next_worker_id.fetch_add(1, Ordering::Relaxed),
        };

        WorkerSpawned {
            pipeline: &guard.pipeline,
            role,
            worker_id: guard.worker_id,
        }
        .log();

        self.workers.spawn(async move {
            let _guard = guard;
            work.await;
        });
    }
}

/// Logs how a worker ended when its task finishes or unwinds.
struct WorkerGuard {
    pipeline: Arc<str>,
    role: WorkerRole,
    worker_id: u64,
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        if std::thread::panicking() {
            WorkerFailed {
                pipeline: &self.pipeline,
                role: self.role,
                worker_id: self.worker_id,
            }
            .log();
        } else {
            WorkerExited {
                pipeline: &self.pipeline,
                role: self.role,
                worker_id: self.worker_id,
            }
            .log();
        }
    }
}
