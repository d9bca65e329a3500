// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for consistent, human-readable output
//! and [`StructuredLog`] to emit the event with its fields attached.
//!
//! # Organization
//!
//! * `worker` - worker lifecycle inside a pipeline
//! * `pipeline` - pipeline runs, deadlines and cancellation
//! * `validation` - configuration validation problems
//!
//! # Usage Pattern
//!
//! ```rust
//! use the_spillway::observability::messages::pipeline::RunStarted;
//! use the_spillway::observability::messages::StructuredLog;
//!
//! let msg = RunStarted {
//!     pipeline: "primes",
//!     runner: "fan_out_fan_in",
//!     take: Some(10),
//! };
//!
//! let span = msg.span("pipeline_run");
//! let _guard = span.enter();
//! msg.log();
//! ```

pub mod pipeline;
pub mod validation;
pub mod worker;

use tracing::Span;

/// A log event that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the event at its documented level.
    fn log(&self);

    /// Open a span carrying the same fields.
    fn span(&self, name: &str) -> Span;
}
