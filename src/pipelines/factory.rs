// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::default_fan_out_width;
use crate::config::{Config, PipelineKind};
use crate::pipelines::{FanOutFanInPipeline, NaivePipeline, RunSettings, SquaresPipeline};
use crate::traits::PipelineRunner;

/// Factory for creating pipeline runners from configuration
pub struct RunnerFactory;

impl RunnerFactory {
    /// Create the runner for the configured pipeline kind
    pub fn from_config(cfg: &Config) -> Box<dyn PipelineRunner> {
        let settings = RunSettings::from_config(cfg);

        match cfg.pipeline {
            PipelineKind::Naive => Box::new(NaivePipeline::new(
                cfg.source.clone(),
                cfg.filter,
                settings,
            )),
            PipelineKind::FanOutFanIn => {
                let width = cfg
                    .options
                    .fan_out_width
                    .unwrap_or_else(default_fan_out_width);
                Box::new(FanOutFanInPipeline::new(
                    cfg.source.clone(),
                    cfg.filter,
                    width,
                    settings,
                ))
            }
            PipelineKind::Squares => Box::new(SquaresPipeline::new(cfg.source.clone(), settings)),
        }
    }
}
