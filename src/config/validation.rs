// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Configuration validation.
//!
//! Checks that a loaded [`Config`] describes a pipeline that can start and that
//! will stop on its own. Every problem is collected so one pass reports them all:
//!
//! 1. **Options**: a fan-out width or timeout of zero
//! 2. **Source**: empty random range, empty cycle range, empty value list,
//!    zero tick interval
//! 3. **Pipeline**: a `filter` set on a pipeline that never applies one
//! 4. **Termination**: an endless source with no `take`
//!
//! # Example
//! ```rust
//! use the_spillway::config::{validate_config, Config, ExecutorOptions, OutputFormat, PipelineKind, SourceConfig};
//! use the_spillway::errors::ValidationError;
//! use the_spillway::functions::FilterKind;
//!
//! let config = Config {
//!     name: None,
//!     pipeline: PipelineKind::Naive,
//!     source: SourceConfig::Counter { start: 0 },
//!     filter: FilterKind::Even,
//!     take: None,
//!     options: ExecutorOptions::default(),
//!     output: OutputFormat::Text,
//! };
//!
//! let problems = validate_config(&config).unwrap_err();
//! assert_eq!(problems, vec![ValidationError::UnboundedSource { source: "counter" }]);
//! ```

use crate::config::{Config, PipelineKind, SourceConfig};
use crate::errors::ValidationError;
use crate::functions::FilterKind;
use crate::observability::messages::validation::ValidationProblem;
use crate::observability::messages::StructuredLog;

/// Validate `cfg`, returning every problem found.
pub fn validate_config(cfg: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if cfg.options.fan_out_width == Some(0) {
        errors.push(ValidationError::ZeroFanOutWidth);
    }
    if cfg.options.timeout_ms == Some(0) {
        errors.push(ValidationError::ZeroTimeout);
    }

    match &cfg.source {
        SourceConfig::Random { max } if *max == 0 => {
            errors.push(ValidationError::EmptyRandomRange);
        }
        SourceConfig::Cycle { start, end } if start >= end => {
            errors.push(ValidationError::EmptyCycleRange {
                start: *start,
                end: *end,
            });
        }
        SourceConfig::Values { values } if values.is_empty() => {
            errors.push(ValidationError::EmptyValues);
        }
        SourceConfig::Ticker { interval_ms } if *interval_ms == 0 => {
            errors.push(ValidationError::ZeroTickInterval);
        }
        _ => {}
    }

    if cfg.pipeline == PipelineKind::Squares && cfg.filter != FilterKind::Identity {
        errors.push(ValidationError::FilterNotApplied {
            pipeline: cfg.pipeline.as_str(),
            filter: cfg.filter.name(),
        });
    }

    if !cfg.source.is_finite() && cfg.take.is_none() {
        errors.push(ValidationError::UnboundedSource {
            source: cfg.source.kind(),
        });
    }

    if errors.is_empty() {
        return Ok(());
    }

    for error in &errors {
        ValidationProblem {
            config: cfg.pipeline_name(),
            error,
        }
        .log();
    }
    Err(errors)
}
