// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ConfigError;
use crate::functions::FilterKind;
use crate::observability::messages::validation::{ConfigAccepted, ConfigRejected};
use crate::observability::messages::StructuredLog;
use serde::Deserialize;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Complete description of one pipeline run.
///
/// Loaded from a YAML or TOML file; the extension decides the format.
///
/// # Fields
/// * `name` - Label used in logs and output (optional, defaults to the pipeline kind)
/// * `pipeline` - Which pipeline shape to build
/// * `source` - Where values come from
/// * `filter` - Stage function applied by `naive` and `fan_out_fan_in` (optional, defaults to identity)
/// * `take` - How many values to keep before cancelling (optional for finite sources)
/// * `options` - Executor tuning (optional)
/// * `output` - How the binary prints the result (optional, defaults to text)
///
/// # Example
/// ```yaml
/// name: primes
/// pipeline: fan_out_fan_in
/// source:
///   kind: random
///   max: 500000000
/// filter: prime
/// take: 10
/// options:
///   fan_out_width: 4
///   timeout_ms: 5000
/// output: json
/// ```
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub name: Option<String>,
    pub pipeline: PipelineKind,
    pub source: SourceConfig,
    #[serde(default)]
    pub filter: FilterKind,
    #[serde(default)]
    pub take: Option<usize>,
    #[serde(default)]
    pub options: ExecutorOptions,
    #[serde(default)]
    pub output: OutputFormat,
}

impl Config {
    /// `name` if set, otherwise the pipeline kind.
    pub fn pipeline_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.pipeline.as_str())
    }
}

/// Pipeline shape.
///
/// # Variants
/// * `Naive` - source, one filter stage, take
/// * `FanOutFanIn` - source, `fan_out_width` filter replicas merged by fan-in, take
/// * `Squares` - source, a squaring stage, optional take
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PipelineKind {
    Naive,
    FanOutFanIn,
    Squares,
}

impl PipelineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineKind::Naive => "naive",
            PipelineKind::FanOutFanIn => "fan_out_fan_in",
            PipelineKind::Squares => "squares",
        }
    }
}

impl Display for PipelineKind {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value source of a pipeline, tagged by `kind`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Endless uniform random values in `0..max`.
    Random { max: u64 },
    /// Endless `start, start + 1, ...`.
    Counter {
        #[serde(default)]
        start: u64,
    },
    /// Endless walk over `start..end`, wrapping around.
    Cycle { start: u64, end: u64 },
    /// The listed values, then end-of-stream.
    Values { values: Vec<u64> },
    /// Endless `0, 1, 2, ...`, one value every `interval_ms` milliseconds.
    Ticker { interval_ms: u64 },
}

impl SourceConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            SourceConfig::Random { .. } => "random",
            SourceConfig::Counter { .. } => "counter",
            SourceConfig::Cycle { .. } => "cycle",
            SourceConfig::Values { .. } => "values",
            SourceConfig::Ticker { .. } => "ticker",
        }
    }

    /// Whether the source ends on its own.
    pub fn is_finite(&self) -> bool {
        matches!(self, SourceConfig::Values { .. })
    }
}

/// Executor-specific configuration options.
///
/// # Fields
/// * `fan_out_width` - Replica count for `fan_out_fan_in` (optional, defaults to available parallelism)
/// * `timeout_ms` - Deadline after which the run is cancelled (optional)
#[derive(Debug, Default, Deserialize)]
pub struct ExecutorOptions {
    pub fan_out_width: Option<usize>,
    pub timeout_ms: Option<u64>,
}

impl ExecutorOptions {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// How the binary renders a finished run.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Load a config from a YAML (`.yaml`, `.yml`) or TOML (`.toml`) file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match extension.as_str() {
        "yaml" | "yml" => {
            let content = fs::read_to_string(path)?;
            Ok(serde_yaml::from_str(&content)?)
        }
        "toml" => {
            let content = fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        }
        _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Load and validate a config file.
///
/// Every validation problem is reported, not just the first one.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let label = path.display().to_string();
    let cfg = load_config(path)?;

    if let Err(problems) = crate::config::validate_config(&cfg) {
        ConfigRejected {
            config: &label,
            problem_count: problems.len(),
        }
        .log();
        return Err(ConfigError::Invalid(problems));
    }

    ConfigAccepted {
        config: &label,
        pipeline: cfg.pipeline_name(),
    }
    .log();

    Ok(cfg)
}
