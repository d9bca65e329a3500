// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for pipeline runs and cancellation.
//!
//! This module contains message types for logging events related to:
//! * Pipeline run lifecycle (start, completion, failure)
//! * Cancellation transitions and their cause
//! * Externally composed deadlines

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Pipeline run started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_spillway::observability::messages::pipeline::RunStarted;
///
/// let msg = RunStarted {
///     pipeline: "primes",
///     runner: "naive",
///     take: Some(10),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct RunStarted<'a> {
    pub pipeline: &'a str,
    pub runner: &'a str,
    pub take: Option<usize>,
}

impl Display for RunStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.take {
            Some(take) => write!(
                f,
                "Starting pipeline '{}' with {} runner, taking {} values",
                self.pipeline, self.runner, take
            ),
            None => write!(
                f,
                "Starting pipeline '{}' with {} runner, draining the source",
                self.pipeline, self.runner
            ),
        }
    }
}

impl StructuredLog for RunStarted<'_> {
    fn log(&self) {
        tracing::info!(
            pipeline = self.pipeline,
            runner = self.runner,
            take = ?self.take,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "pipeline_run",
            span_name = name,
            pipeline = self.pipeline,
            runner = self.runner,
            take = ?self.take,
        )
    }
}

/// Pipeline run finished and its terminal stream was drained.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RunCompleted<'a> {
    pub pipeline: &'a str,
    pub runner: &'a str,
    pub value_count: usize,
    pub duration: Duration,
}

impl Display for RunCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' ({} runner) produced {} values in {:?}",
            self.pipeline, self.runner, self.value_count, self.duration
        )
    }
}

impl StructuredLog for RunCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            pipeline = self.pipeline,
            runner = self.runner,
            value_count = self.value_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "pipeline_completed",
            span_name = name,
            pipeline = self.pipeline,
            runner = self.runner,
            value_count = self.value_count,
            duration = ?self.duration,
        )
    }
}

/// Pipeline run failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_spillway::observability::messages::pipeline::RunFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "test error");
/// let msg = RunFailed {
///     pipeline: "primes",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct RunFailed<'a> {
    pub pipeline: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for RunFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Pipeline '{}' failed: {}", self.pipeline, self.error)
    }
}

impl StructuredLog for RunFailed<'_> {
    fn log(&self) {
        tracing::error!(
            pipeline = self.pipeline,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "pipeline_failed",
            span_name = name,
            pipeline = self.pipeline,
            error = %self.error,
        )
    }
}

/// The pipeline's cancellation signal moved to `Cancelled`.
///
/// # Log Level
/// `info!` - Important operational event
pub struct CancellationTriggered<'a> {
    pub pipeline: &'a str,
    pub reason: &'a str,
}

impl Display for CancellationTriggered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' cancelled by {}",
            self.pipeline, self.reason
        )
    }
}

impl StructuredLog for CancellationTriggered<'_> {
    fn log(&self) {
        tracing::info!(
            pipeline = self.pipeline,
            reason = self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "cancellation",
            span_name = name,
            pipeline = self.pipeline,
            reason = self.reason,
        )
    }
}

/// A deadline was scheduled to cancel the pipeline.
///
/// # Log Level
/// `debug!` - Internal lifecycle detail
pub struct DeadlineScheduled<'a> {
    pub pipeline: &'a str,
    pub after: Duration,
}

impl Display for DeadlineScheduled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' will be cancelled after {:?}",
            self.pipeline, self.after
        )
    }
}

impl StructuredLog for DeadlineScheduled<'_> {
    fn log(&self) {
        tracing::debug!(
            pipeline = self.pipeline,
            after_ms = self.after.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "deadline",
            span_name = name,
            pipeline = self.pipeline,
            after = ?self.after,
        )
    }
}

/// Workers were still running when the shutdown grace period ran out.
///
/// # Log Level
/// `warn!` - A worker ignored cancellation for too long
pub struct WorkersLingering<'a> {
    pub pipeline: &'a str,
    pub live_workers: usize,
    pub grace: Duration,
}

impl Display for WorkersLingering<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' still has {} live workers {:?} after cancellation",
            self.pipeline, self.live_workers, self.grace
        )
    }
}

impl StructuredLog for WorkersLingering<'_> {
    fn log(&self) {
        tracing::warn!(
            pipeline = self.pipeline,
            live_workers = self.live_workers,
            grace_ms = self.grace.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "workers_lingering",
            span_name = name,
            pipeline = self.pipeline,
            live_workers = self.live_workers,
        )
    }
}
