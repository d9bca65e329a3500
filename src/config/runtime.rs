// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;
use std::time::{Duration, Instant};

use crate::config::consts::SHUTDOWN_GRACE;
use crate::config::{Config, OutputFormat};
use crate::engine::PipelineContext;
use crate::errors::PipelineError;
use crate::observability::messages::pipeline::{
    RunCompleted, RunFailed, RunStarted, WorkersLingering,
};
use crate::observability::messages::StructuredLog;
use crate::pipelines::RunnerFactory;
use crate::traits::PipelineRunner;

/// Pipeline runtime builder - turns a configuration into a ready-to-run [`Runtime`].
///
/// # Examples
///
/// ```
/// use the_spillway::config::{Config, ExecutorOptions, OutputFormat, PipelineKind, RuntimeBuilder, SourceConfig};
/// use the_spillway::functions::FilterKind;
///
/// let config = Config {
///     name: Some("evens".to_string()),
///     pipeline: PipelineKind::Naive,
///     source: SourceConfig::Counter { start: 0 },
///     filter: FilterKind::Even,
///     take: Some(5),
///     options: ExecutorOptions::default(),
///     output: OutputFormat::Text,
/// };
///
/// let runtime = RuntimeBuilder::from_config(&config);
/// assert_eq!(runtime.name(), "evens");
/// assert_eq!(runtime.runner_name(), "naive");
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build the runner and output settings for `cfg`.
    pub fn from_config(cfg: &Config) -> Runtime {
        Runtime {
            name: cfg.pipeline_name().to_string(),
            runner: RunnerFactory::from_config(cfg),
            take: cfg.take,
            output: cfg.output,
        }
    }
}

/// One configured pipeline, ready to run any number of times.
pub struct Runtime {
    name: String,
    runner: Box<dyn PipelineRunner>,
    take: Option<usize>,
    output: OutputFormat,
}

impl Runtime {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn runner_name(&self) -> &'static str {
        self.runner.name()
    }

    pub fn output(&self) -> OutputFormat {
        self.output
    }

    /// Run the pipeline on a fresh context.
    ///
    /// The context is cancelled when the run returns, whichever way it ends, and
    /// its workers are given [`SHUTDOWN_GRACE`] to wind down.
    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        let ctx = PipelineContext::new(self.name.as_str());
        self.run_with(&ctx).await
    }

    /// Run the pipeline on a caller-supplied context, so the caller can cancel it.
    pub async fn run_with(&self, ctx: &PipelineContext) -> Result<RunReport, PipelineError> {
        let runner = self.runner.name();
        RunStarted {
            pipeline: &self.name,
            runner,
            take: self.take,
        }
        .log();

        let started = Instant::now();
        let outcome = {
            let _cancel_on_exit = ctx.cancel_on_drop();
            self.runner.run(ctx).await
        };
        let elapsed = started.elapsed();
        self.wait_for_shutdown(ctx).await;

        match outcome {
            Ok(values) => {
                RunCompleted {
                    pipeline: &self.name,
                    runner,
                    value_count: values.len(),
                    duration: elapsed,
                }
                .log();
                Ok(RunReport {
                    pipeline: self.name.clone(),
                    runner: runner.to_string(),
                    values,
                    elapsed_ms: elapsed.as_millis() as u64,
                })
            }
            Err(error) => {
                RunFailed {
                    pipeline: &self.name,
                    error: &error,
                }
                .log();
                Err(error)
            }
        }
    }

    async fn wait_for_shutdown(&self, ctx: &PipelineContext) {
        if !ctx.wait_for_workers(SHUTDOWN_GRACE).await {
            WorkersLingering {
                pipeline: &self.name,
                live_workers: ctx.live_workers(),
                grace: SHUTDOWN_GRACE,
            }
            .log();
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RunReport {
    pub pipeline: String,
    pub runner: String,
    pub values: Vec<u64>,
    pub elapsed_ms: u64,
}

impl RunReport {
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }

    /// Render the report in `format`.
    pub fn render(&self, format: OutputFormat) -> Result<String, PipelineError> {
        match format {
            OutputFormat::Text => Ok(self
                .values
                .iter()
                .map(|value| value.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}
