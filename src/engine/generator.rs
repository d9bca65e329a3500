// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Source workers: turn a production function or an iterator into a stream.
//!
//! A source waits for room in its output before it produces anything, so it is
//! never more than one buffered value ahead of its consumer and never produces a
//! value after it has observed cancellation.

use std::fmt::Display;
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::{PipelineContext, WorkerRole};
use crate::observability::messages::worker::ProductionFailed;
use crate::observability::messages::StructuredLog;
use crate::stream::{channel, Reservation, Stream};

/// Endless stream of `produce()` results, until the pipeline is cancelled.
///
/// `produce` is assumed not to fail. If it panics, the generator worker ends and
/// its stream closes.
///
/// # Example
/// ```rust
/// use the_spillway::engine::{generator, take, PipelineContext};
///
/// # #[tokio::main]
/// # async fn main() {
/// let ctx = PipelineContext::new("counter");
/// let mut next = 0u64;
/// let numbers = generator(&ctx, move || {
///     next += 1;
///     next
/// });
///
/// assert_eq!(take(&ctx, numbers, 3).collect().await, vec![1, 2, 3]);
/// # }
/// ```
pub fn generator<T, F>(ctx: &PipelineContext, mut produce: F) -> Stream<T>
where
    T: Send + 'static,
    F: FnMut() -> T + Send + 'static,
{
    let (writer, stream) = channel();
    let observer = ctx.observer();

    ctx.spawn_worker(WorkerRole::Generator, async move {
        loop {
            match writer.reserve(&observer).await {
                Reservation::Ready(slot) => slot.write(produce()),
                Reservation::Cancelled | Reservation::Closed => break,
            }
        }
    });

    stream
}

/// Like [`generator`], for production functions that can fail.
///
/// The first `Err` is logged as a production failure and ends the worker; the
/// stream closes and downstream consumers see end-of-stream.
pub fn try_generator<T, E, F>(ctx: &PipelineContext, mut produce: F) -> Stream<T>
where
    T: Send + 'static,
    E: Display + Send + 'static,
    F: FnMut() -> Result<T, E> + Send + 'static,
{
    let (writer, stream) = channel();
    let observer = ctx.observer();
    let pipeline = ctx.name().to_string();

    ctx.spawn_worker(WorkerRole::Generator, async move {
        loop {
            let slot = match writer.reserve(&observer).await {
                Reservation::Ready(slot) => slot,
                Reservation::Cancelled | Reservation::Closed => break,
            };

            match produce() {
                Ok(value) => slot.write(value),
                Err(error) => {
                    ProductionFailed {
                        pipeline: &pipeline,
                        role: WorkerRole::Generator,
                        error: &error,
                    }
                    .log();
                    break;
                }
            }
        }
    });

    stream
}

/// Finite stream of the items of `items`, in order.
///
/// Closes after the last item, or earlier if the pipeline is cancelled.
pub fn from_iter<I>(ctx: &PipelineContext, items: I) -> Stream<I::Item>
where
    I: IntoIterator,
    I::IntoIter: Send + 'static,
    I::Item: Send + 'static,
{
    let (writer, stream) = channel();
    let observer = ctx.observer();
    let mut items = items.into_iter();

    ctx.spawn_worker(WorkerRole::Generator, async move {
        loop {
            let slot = match writer.reserve(&observer).await {
                Reservation::Ready(slot) => slot,
                Reservation::Cancelled | Reservation::Closed => break,
            };
            match items.next() {
                Some(item) => slot.write(item),
                None => break,
            }
        }
    });

    stream
}

/// Endless `0, 1, 2, ...`, one value per `period`, until the pipeline is cancelled.
///
/// The first value is due one `period` after the call. A consumer slower than
/// `period` pushes later ticks back rather than receiving a burst of them.
pub fn ticker(ctx: &PipelineContext, period: Duration) -> Stream<u64> {
    let (writer, stream) = channel();
    let observer = ctx.observer();
    // tokio panics on a zero period.
    let period = period.max(Duration::from_nanos(1));

    ctx.spawn_worker(WorkerRole::Generator, async move {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut tick = 0u64;

        loop {
            tokio::select! {
                biased;
                _ = observer.cut_short() => break,
                _ = interval.tick() => {}
            }
            match writer.reserve(&observer).await {
                Reservation::Ready(slot) => slot.write(tick),
                Reservation::Cancelled | Reservation::Closed => break,
            }
            tick = tick.wrapping_add(1);
        }
    });

    stream
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::take;
    use crate::stream::Upstream;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_generator_is_lazy() {
        let ctx = PipelineContext::new("lazy");
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut stream = generator(&ctx, move || counter.fetch_add(1, Ordering::SeqCst));
        tokio::time::sleep(Duration::from_millis(30)).await;

        // One value fills the buffer; nothing more until someone reads.
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert_eq!(stream.recv().await, Some(0));
        assert_eq!(stream.recv().await, Some(1));

        ctx.cancel("test");
        assert!(ctx.wait_for_workers(Duration::from_secs(1)).await);
        assert!(calls.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_generator_closes_on_cancel() {
        let ctx = PipelineContext::new("cancel");
        let mut stream = generator(&ctx, || 42u8);

        assert_eq!(stream.recv().await, Some(42));
        ctx.cancel("test");

        // At most the one buffered value, then end-of-stream.
        let rest = tokio::time::timeout(Duration::from_secs(1), async move {
            let mut rest = Vec::new();
            while let Some(value) = stream.recv().await {
                rest.push(value);
            }
            rest
        })
        .await
        .expect("generator should close after cancellation");
        assert!(rest.len() <= 1);
        assert!(ctx.wait_for_workers(Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn test_generator_exits_when_reader_is_dropped() {
        let ctx = PipelineContext::new("dropped");
        let stream = generator(&ctx, || 1u32);
        drop(stream);

        assert!(ctx.wait_for_workers(Duration::from_secs(1)).await);
        assert!(!ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_panicking_generator_closes_its_stream() {
        let ctx = PipelineContext::new("panicking");
        let mut produced = 0;
        let stream = generator(&ctx, move || {
            produced += 1;
            if produced > 2 {
                panic!("sensor offline");
            }
            produced
        });

        let values = tokio::time::timeout(Duration::from_secs(1), stream.collect())
            .await
            .expect("stream should close after the worker panics");
        assert_eq!(values, vec![1, 2]);
        assert!(ctx.wait_for_workers(Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn test_try_generator_stops_at_first_error() {
        let ctx = PipelineContext::new("fallible");
        let mut readings = vec![Ok(3), Ok(5), Err("sensor offline"), Ok(7)].into_iter();
        let stream = try_generator(&ctx, move || readings.next().unwrap_or(Err("exhausted")));

        assert_eq!(stream.collect().await, vec![3, 5]);
        assert!(ctx.wait_for_workers(Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn test_from_iter_yields_items_then_closes() {
        let ctx = PipelineContext::new("slice");
        let stream = from_iter(&ctx, vec![2, 3, 4, 7, 1]);
        assert_eq!(stream.collect().await, vec![2, 3, 4, 7, 1]);
    }

    #[tokio::test]
    async fn test_from_iter_stops_on_cancel() {
        let ctx = PipelineContext::new("slice_cancel");
        let mut stream = from_iter(&ctx, 0..u64::MAX);
        let observer = ctx.observer();

        assert_eq!(stream.next(&observer).await.into_item(), Some(0));
        ctx.cancel("test");
        assert!(ctx.wait_for_workers(Duration::from_secs(1)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_counts_one_value_per_period() {
        let ctx = PipelineContext::new("ticker");
        let started = Instant::now();

        let ticks = take(&ctx, ticker(&ctx, Duration::from_millis(10)), 5);
        assert_eq!(ticks.collect().await, vec![0, 1, 2, 3, 4]);
        assert!(started.elapsed() >= Duration::from_millis(50));

        assert!(ctx.wait_for_workers(Duration::from_secs(1)).await);
        assert_eq!(ctx.live_workers(), 0);
    }

    #[tokio::test]
    async fn test_ticker_stops_while_waiting_for_a_tick() {
        let ctx = PipelineContext::new("slow_ticker");
        let stream = ticker(&ctx, Duration::from_secs(3600));

        ctx.cancel("test");
        assert!(ctx.wait_for_workers(Duration::from_secs(1)).await);
        assert!(ctx.interrupted_work());
        assert_eq!(stream.collect().await, Vec::<u64>::new());
    }
}
