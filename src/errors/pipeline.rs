// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors surfaced by pipeline runs.
//!
//! Nothing here ever travels through a stream. Workers only pass data or
//! end-of-stream downstream; these errors describe how a whole run ended.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// The external deadline cancelled the run before it finished.
    #[error("Deadline of {deadline:?} passed after {collected} values")]
    DeadlineExceeded { deadline: Duration, collected: usize },

    /// The run was cancelled from outside before it could finish.
    #[error("Pipeline cancelled by {reason} after {collected} values")]
    Cancelled {
        reason: &'static str,
        collected: usize,
    },

    /// Rendering the run report failed.
    #[error("Failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}
