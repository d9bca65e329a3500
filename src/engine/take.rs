// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bounded prefix of a stream, and the usual owner of a pipeline's cancellation.
//!
//! `take` forwards at most `n` values, then cancels the pipeline so every upstream
//! worker winds down, and finally closes its own output. Upstream ending early is
//! not an error: the output simply holds fewer than `n` values.
//!
//! # Slop
//!
//! Cancellation is cooperative. A worker that has already read a value when the
//! signal flips may still hand it to its downstream neighbour before it notices,
//! so each worker can move at most one extra element after cancellation. Those
//! elements are dropped by whichever neighbour is already watching the signal;
//! `take` itself never forwards more than `n`.

use super::{PipelineContext, WorkerRole};
use crate::stream::{channel, Delivery, Next, Stream, Upstream};

/// Cancellation reason recorded by `take`.
pub const TAKE_REASON: &str = "take";

/// First `n` values of `input`, then cancel the pipeline.
pub fn take<T>(ctx: &PipelineContext, mut input: Stream<T>, n: usize) -> Stream<T>
where
    T: Send + 'static,
{
    let (writer, output) = channel();
    let observer = ctx.observer();
    let owner = ctx.clone();

    ctx.spawn_worker(WorkerRole::Take, async move {
        let mut taken = 0;
        while taken < n {
            let Next::Item(value) = input.next(&observer).await else {
                break;
            };
            if writer.send(value, &observer).await != Delivery::Delivered {
                break;
            }
            taken += 1;
        }

        owner.cancel(TAKE_REASON);
        drop(writer);
    });

    output
}
