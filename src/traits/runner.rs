// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::engine::PipelineContext;
use crate::errors::PipelineError;

/// A complete pipeline, from source to terminal consumer.
///
/// Implementations build their workers on the given context and drain the
/// terminal stream. The context belongs to the caller, who may cancel it at any
/// time; a runner must return promptly once that happens.
#[async_trait]
pub trait PipelineRunner: Send + Sync {
    async fn run(&self, ctx: &PipelineContext) -> Result<Vec<u64>, PipelineError>;

    fn name(&self) -> &'static str;
}
