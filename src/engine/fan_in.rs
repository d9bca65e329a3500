// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Merge many streams into one.
//!
//! One relay worker per input forwards values into the merged stream. Relays
//! share a [`JoinCounter`]; a coordinator worker holds the merged stream's
//! original writer and drops it, closing the stream, only when the counter reaches
//! zero. The merged stream therefore closes if and only if every relay has exited.
//!
//! ```text
//!   input[0] --relay--\
//!   input[1] --relay----> merged --> ...
//!   input[2] --relay--/      ^
//!                            | closed by the coordinator once the counter hits 0
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use super::{PipelineContext, WorkerRole};
use crate::observability::messages::worker::FanInClosed;
use crate::observability::messages::StructuredLog;
use crate::signal::CancellationObserver;
use crate::stream::{channel, Delivery, Next, Stream, StreamWriter, Upstream};

/// Count of producers that are still running.
#[derive(Debug)]
pub struct JoinCounter {
    remaining: AtomicUsize,
    zero: Notify,
}

impl JoinCounter {
    pub fn new(producers: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(producers),
            zero: Notify::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }

    /// Record one producer as finished. Calls past zero are ignored.
    pub fn leave(&self) {
        let left = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |remaining| {
                remaining.checked_sub(1)
            });
        if left == Ok(1) {
            self.zero.notify_waiters();
        }
    }

    /// Wait until every producer has left.
    pub async fn wait(&self) {
        loop {
            // Registered before the check, so a leave() in between is not missed.
            let notified = self.zero.notified();
            if self.remaining() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Leaves the counter when dropped, whichever way the relay exits.
struct JoinTicket(Arc<JoinCounter>);

impl Drop for JoinTicket {
    fn drop(&mut self) {
        self.0.leave();
    }
}

/// Merge `streams` into one. Values from different inputs interleave in no
/// particular order; values from one input keep their relative order.
pub fn fan_in<T>(ctx: &PipelineContext, streams: Vec<Stream<T>>) -> Stream<T>
where
    T: Send + 'static,
{
    let (writer, merged) = channel();
    let relays = streams.len();
    let counter = Arc::new(JoinCounter::new(relays));

    for input in streams {
        let ticket = JoinTicket(Arc::clone(&counter));
        let relay_writer = writer.fork();
        let observer = ctx.observer();

        ctx.spawn_worker(WorkerRole::Relay, async move {
            let _ticket = ticket;
            relay(input, relay_writer, observer).await;
        });
    }

    let pipeline = ctx.name().to_string();
    ctx.spawn_worker(WorkerRole::Coordinator, async move {
        counter.wait().await;
        drop(writer);
        FanInClosed {
            pipeline: &pipeline,
            relays,
        }
        .log();
    });

    merged
}

/// Forward everything from `input` into `writer`. The writer is dropped on
/// return, before the relay's ticket.
async fn relay<T: Send>(
    mut input: Stream<T>,
    writer: StreamWriter<T>,
    observer: CancellationObserver,
) {
    while let Next::Item(value) = input.next(&observer).await {
        if writer.send(value, &observer).await != Delivery::Delivered {
            break;
        }
    }
}
