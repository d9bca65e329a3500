// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use super::{open_source, RunSettings};
use crate::config::SourceConfig;
use crate::engine::{fan_in, fan_out, PipelineContext};
use crate::errors::PipelineError;
use crate::functions::FilterKind;
use crate::traits::PipelineRunner;

/// Source, `width` filter replicas, fan-in, take.
///
/// ```text
///           /--> stage(filter) --\
/// source ----+--> stage(filter) ---+--> fan_in --> take(n)
///           \--> stage(filter) --/
/// ```
///
/// Values leave in completion order, not source order.
pub struct FanOutFanInPipeline {
    source: SourceConfig,
    filter: FilterKind,
    width: usize,
    settings: RunSettings,
}

impl FanOutFanInPipeline {
    pub fn new(
        source: SourceConfig,
        filter: FilterKind,
        width: usize,
        settings: RunSettings,
    ) -> Self {
        Self {
            source,
            filter,
            width,
            settings,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

#[async_trait]
impl PipelineRunner for FanOutFanInPipeline {
    async fn run(&self, ctx: &PipelineContext) -> Result<Vec<u64>, PipelineError> {
        self.settings.arm(ctx);

        let filter = self.filter;
        let source = open_source(ctx, &self.source);
        let replicas = fan_out(ctx, source, move |n| filter.apply(n), self.width);
        let merged = fan_in(ctx, replicas);

        let values = self.settings.drain(ctx, merged).await;
        self.settings.settle(ctx, values)
    }

    fn name(&self) -> &'static str {
        "fan_out_fan_in"
    }
}
