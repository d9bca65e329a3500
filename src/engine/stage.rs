// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::{PipelineContext, WorkerRole};
use crate::stream::{channel, Delivery, Next, Stream, Upstream};

/// Transform and filter `input` through `f`.
///
/// `Some(u)` is forwarded, `None` drops the element. Values keep the order they
/// were read in, and only one element is in flight at a time.
pub fn stage<T, U, F>(ctx: &PipelineContext, input: Stream<T>, f: F) -> Stream<U>
where
    T: Send + 'static,
    U: Send + 'static,
    F: Fn(T) -> Option<U> + Send + Sync + 'static,
{
    spawn_stage(ctx, input, Arc::new(f), WorkerRole::Stage)
}

/// Stage that forwards `f(t)` for every element.
pub fn map<T, U, F>(ctx: &PipelineContext, input: Stream<T>, f: F) -> Stream<U>
where
    T: Send + 'static,
    U: Send + 'static,
    F: Fn(T) -> U + Send + Sync + 'static,
{
    stage(ctx, input, move |value| Some(f(value)))
}

/// Start one stage worker reading from any upstream. Fan-out shares `f`
/// between its replicas through the `Arc`.
pub(crate) fn spawn_stage<I, T, U, F>(
    ctx: &PipelineContext,
    mut input: I,
    f: Arc<F>,
    role: WorkerRole,
) -> Stream<U>
where
    I: Upstream<T> + 'static,
    T: Send + 'static,
    U: Send + 'static,
    F: Fn(T) -> Option<U> + Send + Sync + 'static,
{
    let (writer, output) = channel();
    let observer = ctx.observer();

    ctx.spawn_worker(role, async move {
        while let Next::Item(value) = input.next(&observer).await {
            let Some(result) = f(value) else {
                continue;
            };
            if writer.send(result, &observer).await != Delivery::Delivered {
                break;
            }
        }
    });

    output
}
