// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::Duration;

use crate::config::SourceConfig;
use crate::engine::{from_iter, generator, ticker, PipelineContext};
use crate::functions::{counter, cycle, random_below};
use crate::stream::Stream;

/// Start the generator described by `source`.
///
/// Assumes `source` passed validation; empty ranges are not checked here.
pub fn open_source(ctx: &PipelineContext, source: &SourceConfig) -> Stream<u64> {
    match source {
        SourceConfig::Random { max } => generator(ctx, random_below(*max)),
        SourceConfig::Counter { start } => generator(ctx, counter(*start)),
        SourceConfig::Cycle { start, end } => generator(ctx, cycle(*start, *end)),
        SourceConfig::Values { values } => from_iter(ctx, values.clone()),
        SourceConfig::Ticker { interval_ms } => ticker(ctx, Duration::from_millis(*interval_ms)),
    }
}
