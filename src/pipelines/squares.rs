// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use super::{open_source, RunSettings};
use crate::config::SourceConfig;
use crate::engine::{stage, PipelineContext};
use crate::errors::PipelineError;
use crate::functions::square;
use crate::traits::PipelineRunner;

/// Squares every source value. Squares that overflow a `u64` are dropped.
pub struct SquaresPipeline {
    source: SourceConfig,
    settings: RunSettings,
}

impl SquaresPipeline {
    pub fn new(source: SourceConfig, settings: RunSettings) -> Self {
        Self { source, settings }
    }
}

#[async_trait]
impl PipelineRunner for SquaresPipeline {
    async fn run(&self, ctx: &PipelineContext) -> Result<Vec<u64>, PipelineError> {
        self.settings.arm(ctx);

        let squared = stage(ctx, open_source(ctx, &self.source), square);

        let values = self.settings.drain(ctx, squared).await;
        self.settings.settle(ctx, values)
    }

    fn name(&self) -> &'static str {
        "squares"
    }
}
