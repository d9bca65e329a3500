// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::engine::{
    fan_in, fan_out, from_iter, generator, map, stage, take, PipelineContext, DEADLINE_REASON,
    TAKE_REASON,
};
use crate::functions::{counter, cycle, is_even, is_prime};

/// End-to-end pipelines assembled from the engine constructors
#[cfg(test)]
mod tests {
    use super::*;

    const GRACE: Duration = Duration::from_secs(2);

    #[tokio::test]
    async fn test_counter_even_take_five() {
        let ctx = PipelineContext::new("evens");

        let numbers = generator(&ctx, counter(0));
        let evens = stage(&ctx, numbers, |n| is_even(n).then_some(n));
        let values = tokio::time::timeout(GRACE, take(&ctx, evens, 5).collect())
            .await
            .expect("pipeline should finish");

        assert_eq!(values, vec![0, 2, 4, 6, 8]);
        assert_eq!(ctx.cancel_reason(), Some(TAKE_REASON));
        assert!(ctx.wait_for_workers(GRACE).await);
        assert_eq!(ctx.live_workers(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_prime_fan_out_fan_in_take_ten() {
        let ctx = PipelineContext::new("primes");

        let numbers = generator(&ctx, cycle(1, 100));
        let replicas = fan_out(&ctx, numbers, |n| is_prime(n).then_some(n), 3);
        let values = tokio::time::timeout(GRACE, take(&ctx, fan_in(&ctx, replicas), 10).collect())
            .await
            .expect("pipeline should finish");

        assert_eq!(values.len(), 10);
        assert!(values.iter().all(|n| (1..100).contains(n) && is_prime(*n)));

        // Each pass over 1..100 yields 25 primes, so the first ten values are
        // distinct unless the cycle wrapped, which needs at least 25 of them.
        let distinct: HashSet<u64> = values.iter().copied().collect();
        assert_eq!(distinct.len(), 10);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_no_workers_outlive_the_pipeline() {
        let ctx = PipelineContext::new("leaks");

        let numbers = generator(&ctx, counter(1));
        let replicas = fan_out(&ctx, numbers, |n| is_prime(n).then_some(n), 4);
        let values = take(&ctx, fan_in(&ctx, replicas), 10).collect().await;
        assert_eq!(values.len(), 10);

        // generator + 4 replicas + 4 relays + coordinator + take
        assert!(ctx.wait_for_workers(GRACE).await);
        assert_eq!(ctx.live_workers(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_take_triggers_cancel_exactly_once() {
        let ctx = PipelineContext::new("once");
        let transitions = Arc::new(AtomicUsize::new(0));

        let numbers = generator(&ctx, counter(0));
        let values = take(&ctx, numbers, 3).collect().await;
        assert_eq!(values, vec![0, 1, 2]);

        let mut attempts = Vec::new();
        for _ in 0..8 {
            let ctx = ctx.clone();
            let transitions = Arc::clone(&transitions);
            attempts.push(tokio::spawn(async move {
                if ctx.cancel("caller") {
                    transitions.fetch_add(1, Ordering::SeqCst);
                }
            }));
        }
        for attempt in attempts {
            attempt.await.unwrap();
        }

        // take already moved the signal, so none of the later requests did.
        assert_eq!(transitions.load(Ordering::SeqCst), 0);
        assert_eq!(ctx.cancel_reason(), Some(TAKE_REASON));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_double_cancel_is_harmless() {
        let ctx = PipelineContext::new("double");
        let mut output = map(&ctx, generator(&ctx, counter(0)), |n| n * 3);
        assert_eq!(output.recv().await, Some(0));

        let first = {
            let ctx = ctx.clone();
            tokio::spawn(async move { ctx.cancel("first") })
        };
        let second = {
            let ctx = ctx.clone();
            tokio::spawn(async move { ctx.cancel("second") })
        };
        let outcomes = [first.await.unwrap(), second.await.unwrap()];
        assert_eq!(outcomes.iter().filter(|won| **won).count(), 1);

        let rest = tokio::time::timeout(GRACE, output.collect())
            .await
            .expect("stream should close after cancellation");
        assert!(rest.len() <= 2);
        assert!(ctx.wait_for_workers(GRACE).await);
    }

    #[tokio::test]
    async fn test_finite_source_closes_every_stage() {
        let ctx = PipelineContext::new("finite");

        let doubled = map(&ctx, from_iter(&ctx, 1..=5u64), |n| n * 2);
        let squares_of_doubled = map(&ctx, doubled, |n| n * n);
        let values = squares_of_doubled.collect().await;

        assert_eq!(values, vec![4, 16, 36, 64, 100]);
        assert!(!ctx.is_cancelled());
        assert!(ctx.wait_for_workers(GRACE).await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_deadline_stops_a_starved_pipeline() {
        let ctx = PipelineContext::new("starved");
        ctx.cancel_after(Duration::from_millis(50));

        // Nothing ever passes the filter, so only the deadline ends the run.
        let numbers = generator(&ctx, counter(0));
        let nothing = stage(&ctx, numbers, |_: u64| None::<u64>);
        let values = tokio::time::timeout(GRACE, take(&ctx, nothing, 1).collect())
            .await
            .expect("deadline should stop the pipeline");

        assert!(values.is_empty());
        assert_eq!(ctx.cancel_reason(), Some(DEADLINE_REASON));
        assert!(ctx.wait_for_workers(GRACE).await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_independent_pipelines_do_not_interfere() {
        let short = PipelineContext::new("short");
        let long = PipelineContext::new("long");

        let short_values = take(&short, generator(&short, counter(0)), 2).collect().await;
        assert!(short.is_cancelled());
        assert!(!long.is_cancelled());

        let long_values = take(&long, generator(&long, counter(100)), 20).collect().await;
        assert_eq!(short_values, vec![0, 1]);
        assert_eq!(long_values, (100..120).collect::<Vec<u64>>());
    }
}
