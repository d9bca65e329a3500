// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Every diagnostic event the crate emits is a message struct from
//! [`messages`] that implements `Display` (human-readable text) and
//! [`messages::StructuredLog`] (the same event with structured `tracing` fields).
//! Call sites never format log strings themselves.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::worker` - worker spawn, exit and failure events
//! * `messages::pipeline` - pipeline runs and cancellation
//! * `messages::validation` - configuration validation problems
//!
//! # Usage
//!
//! ```rust
//! use the_spillway::observability::messages::pipeline::CancellationTriggered;
//! use the_spillway::observability::messages::StructuredLog;
//!
//! let msg = CancellationTriggered {
//!     pipeline: "primes",
//!     reason: "take",
//! };
//!
//! msg.log();
//! ```

pub mod messages;

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Install the global `fmt` subscriber, filtered by `RUST_LOG`. Logs go to
/// stderr so rendered output on stdout stays clean.
///
/// Calling it a second time is harmless; the first subscriber stays in place.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
