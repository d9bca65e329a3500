// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use thiserror::Error;

/// Problems found while validating a pipeline configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// `options.fan_out_width` was set to zero
    ZeroFanOutWidth,
    /// `options.timeout_ms` was set to zero
    ZeroTimeout,
    /// A random source needs a non-empty range
    EmptyRandomRange,
    /// A cycle source needs `start < end`
    EmptyCycleRange {
        start: u64,
        end: u64,
    },
    /// A values source needs at least one value
    EmptyValues,
    /// The pipeline kind never applies `filter`, so setting one is a mistake
    FilterNotApplied {
        /// The pipeline kind, as written in the config
        pipeline: &'static str,
        /// The configured filter
        filter: &'static str,
    },
    /// A ticker source needs a non-zero interval
    ZeroTickInterval,
    /// An endless source without `take` would never finish
    UnboundedSource {
        /// The source kind, as written in the config
        source: &'static str,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::ZeroFanOutWidth => {
                write!(f, "options.fan_out_width must be at least 1")
            }
            ValidationError::ZeroTimeout => {
                write!(f, "options.timeout_ms must be greater than 0")
            }
            ValidationError::EmptyRandomRange => {
                write!(f, "random source needs max greater than 0")
            }
            ValidationError::EmptyCycleRange { start, end } => {
                write!(
                    f,
                    "cycle source needs start < end, got start={} end={}",
                    start, end
                )
            }
            ValidationError::EmptyValues => {
                write!(f, "values source needs at least one value")
            }
            ValidationError::FilterNotApplied { pipeline, filter } => {
                write!(
                    f,
                    "{} pipeline does not apply a filter, but filter '{}' is set",
                    pipeline, filter
                )
            }
            ValidationError::ZeroTickInterval => {
                write!(f, "ticker source needs interval_ms greater than 0")
            }
            ValidationError::UnboundedSource { source } => {
                write!(
                    f,
                    "{} source never ends; set 'take' to bound the pipeline",
                    source
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors from loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// The file extension is neither YAML nor TOML.
    #[error("Unsupported config format '{0}' (expected .yaml, .yml or .toml)")]
    UnsupportedFormat(String),

    #[error("Configuration validation failed:\n{}", join_lines(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_lines(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
