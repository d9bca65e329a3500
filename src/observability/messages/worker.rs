// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for worker lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Worker spawn and exit
//! * Fatal worker failures (panics in caller-supplied functions)
//! * Production failures reported by fallible generators
//! * Fan-out and fan-in bookkeeping

use crate::engine::WorkerRole;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Worker spawned inside a pipeline.
///
/// # Log Level
/// `debug!` - Internal lifecycle detail
pub struct WorkerSpawned<'a> {
    pub pipeline: &'a str,
    pub role: WorkerRole,
    pub worker_id: u64,
}

impl Display for WorkerSpawned<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' spawned {} worker #{}",
            self.pipeline, self.role, self.worker_id
        )
    }
}

impl StructuredLog for WorkerSpawned<'_> {
    fn log(&self) {
        tracing::debug!(
            pipeline = self.pipeline,
            role = %self.role,
            worker_id = self.worker_id,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "worker",
            span_name = name,
            pipeline = self.pipeline,
            role = %self.role,
            worker_id = self.worker_id,
        )
    }
}

/// Worker left its loop and closed its output.
///
/// # Log Level
/// `debug!` - Internal lifecycle detail
pub struct WorkerExited<'a> {
    pub pipeline: &'a str,
    pub role: WorkerRole,
    pub worker_id: u64,
}

impl Display for WorkerExited<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' {} worker #{} exited",
            self.pipeline, self.role, self.worker_id
        )
    }
}

impl StructuredLog for WorkerExited<'_> {
    fn log(&self) {
        tracing::debug!(
            pipeline = self.pipeline,
            role = %self.role,
            worker_id = self.worker_id,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "worker_exited",
            span_name = name,
            pipeline = self.pipeline,
            role = %self.role,
            worker_id = self.worker_id,
        )
    }
}

/// Worker terminated abruptly because a caller-supplied function panicked.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_spillway::engine::WorkerRole;
/// use the_spillway::observability::messages::worker::WorkerFailed;
///
/// let msg = WorkerFailed {
///     pipeline: "primes",
///     role: WorkerRole::Generator,
///     worker_id: 3,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct WorkerFailed<'a> {
    pub pipeline: &'a str,
    pub role: WorkerRole,
    pub worker_id: u64,
}

impl Display for WorkerFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' {} worker #{} panicked; its output stream was closed",
            self.pipeline, self.role, self.worker_id
        )
    }
}

impl StructuredLog for WorkerFailed<'_> {
    fn log(&self) {
        tracing::error!(
            pipeline = self.pipeline,
            role = %self.role,
            worker_id = self.worker_id,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "worker_failed",
            span_name = name,
            pipeline = self.pipeline,
            role = %self.role,
            worker_id = self.worker_id,
        )
    }
}

/// A fallible production function returned an error.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ProductionFailed<'a> {
    pub pipeline: &'a str,
    pub role: WorkerRole,
    pub error: &'a dyn Display,
}

impl Display for ProductionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' {} worker stopped after production failure: {}",
            self.pipeline, self.role, self.error
        )
    }
}

impl StructuredLog for ProductionFailed<'_> {
    fn log(&self) {
        tracing::error!(
            pipeline = self.pipeline,
            role = %self.role,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "production_failed",
            span_name = name,
            pipeline = self.pipeline,
            role = %self.role,
            error = %self.error,
        )
    }
}

/// Fan-out was asked for zero replicas; its input is dropped unread.
///
/// # Log Level
/// `warn!` - Degraded behavior
pub struct FanOutEmpty<'a> {
    pub pipeline: &'a str,
}

impl Display for FanOutEmpty<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' fan-out width is 0; no replicas started and the input was dropped",
            self.pipeline
        )
    }
}

impl StructuredLog for FanOutEmpty<'_> {
    fn log(&self) {
        tracing::warn!(pipeline = self.pipeline, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "fan_out_empty",
            span_name = name,
            pipeline = self.pipeline,
        )
    }
}

/// Every fan-in relay has exited and the merged stream was closed.
///
/// # Log Level
/// `debug!` - Internal lifecycle detail
pub struct FanInClosed<'a> {
    pub pipeline: &'a str,
    pub relays: usize,
}

impl Display for FanInClosed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' fan-in closed after {} relays finished",
            self.pipeline, self.relays
        )
    }
}

impl StructuredLog for FanInClosed<'_> {
    fn log(&self) {
        tracing::debug!(
            pipeline = self.pipeline,
            relays = self.relays,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "fan_in_closed",
            span_name = name,
            pipeline = self.pipeline,
            relays = self.relays,
        )
    }
}
