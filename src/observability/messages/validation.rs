// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration loading and validation.
//!
//! This module contains message types for logging events related to:
//! * Individual validation problems found in a config
//! * Configs rejected by validation
//! * Configs accepted and ready to run

use crate::errors::ValidationError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// One problem found while validating a config.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_spillway::errors::ValidationError;
/// use the_spillway::observability::messages::validation::ValidationProblem;
///
/// let error = ValidationError::ZeroFanOutWidth;
/// let msg = ValidationProblem {
///     config: "configs/primes.yaml",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct ValidationProblem<'a> {
    pub config: &'a str,
    pub error: &'a ValidationError,
}

impl Display for ValidationProblem<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Invalid config '{}': {}", self.config, self.error)
    }
}

impl StructuredLog for ValidationProblem<'_> {
    fn log(&self) {
        tracing::error!(
            config = self.config,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "validation_problem",
            name = name,
            config = self.config,
            error = %self.error,
        )
    }
}

/// Config rejected after validation found problems.
///
/// # Log Level
/// `warn!` - The run is skipped
pub struct ConfigRejected<'a> {
    pub config: &'a str,
    pub problem_count: usize,
}

impl Display for ConfigRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Config '{}' rejected with {} problem(s)",
            self.config, self.problem_count
        )
    }
}

impl StructuredLog for ConfigRejected<'_> {
    fn log(&self) {
        tracing::warn!(
            config = self.config,
            problem_count = self.problem_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::WARN,
            "config_rejected",
            name = name,
            config = self.config,
            problem_count = self.problem_count,
        )
    }
}

/// Config loaded and validated.
///
/// # Log Level
/// `debug!` - Internal detail
pub struct ConfigAccepted<'a> {
    pub config: &'a str,
    pub pipeline: &'a str,
}

impl Display for ConfigAccepted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Config '{}' accepted for {} pipeline",
            self.config, self.pipeline
        )
    }
}

impl StructuredLog for ConfigAccepted<'_> {
    fn log(&self) {
        tracing::debug!(
            config = self.config,
            pipeline = self.pipeline,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::DEBUG,
            "config_accepted",
            name = name,
            config = self.config,
            pipeline = self.pipeline,
        )
    }
}
