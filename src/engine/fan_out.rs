// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::stage::spawn_stage;
use super::{PipelineContext, WorkerRole};
use crate::observability::messages::worker::FanOutEmpty;
use crate::observability::messages::StructuredLog;
use crate::stream::Stream;

/// Run `width` replicas of the stage `f` against one shared `input`.
///
/// Replicas compete for input values; which replica gets a given value is up to
/// the scheduler, so `f` should be free of side effects whose order matters.
/// Each replica has its own output stream and closes it on its own when the input
/// ends or the pipeline is cancelled.
///
/// Returns exactly `width` streams. With a `width` of zero nothing reads the
/// input: it is dropped, so its writer sees the stream closed and stops.
pub fn fan_out<T, U, F>(
    ctx: &PipelineContext,
    input: Stream<T>,
    f: F,
    width: usize,
) -> Vec<Stream<U>>
where
    T: Send + 'static,
    U: Send + 'static,
    F: Fn(T) -> Option<U> + Send + Sync + 'static,
{
    if width == 0 {
        FanOutEmpty {
            pipeline: ctx.name(),
        }
        .log();
        return Vec::new();
    }

    let shared = input.into_shared();
    let f = Arc::new(f);

    (0..width)
        .map(|replica| {
            spawn_stage(
                ctx,
                shared.clone(),
                Arc::clone(&f),
                WorkerRole::Replica(replica),
            )
        })
        .collect()
}
