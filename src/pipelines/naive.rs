// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use super::{open_source, RunSettings};
use crate::config::SourceConfig;
use crate::engine::{stage, PipelineContext};
use crate::errors::PipelineError;
use crate::functions::FilterKind;
use crate::traits::PipelineRunner;

/// Source, one filter stage, take.
///
/// ```text
/// source --> stage(filter) --> take(n)
/// ```
pub struct NaivePipeline {
    source: SourceConfig,
    filter: FilterKind,
    settings: RunSettings,
}

impl NaivePipeline {
    pub fn new(source: SourceConfig, filter: FilterKind, settings: RunSettings) -> Self {
        Self {
            source,
            filter,
            settings,
        }
    }
}

#[async_trait]
impl PipelineRunner for NaivePipeline {
    async fn run(&self, ctx: &PipelineContext) -> Result<Vec<u64>, PipelineError> {
        self.settings.arm(ctx);

        let filter = self.filter;
        let source = open_source(ctx, &self.source);
        let filtered = stage(ctx, source, move |n| filter.apply(n));

        let values = self.settings.drain(ctx, filtered).await;
        self.settings.settle(ctx, values)
    }

    fn name(&self) -> &'static str {
        "naive"
    }
}
