// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Ready-made pipelines over `u64` values, selected by config.
//!
//! Every runner follows the same outline: arm the deadline, open the source,
//! wire its stages, drain the terminal stream through `take` when one is set,
//! then turn the cancellation reason into the run's outcome.

mod factory;
mod fan_out_fan_in;
mod naive;
mod sources;
mod squares;

pub use factory::RunnerFactory;
pub use fan_out_fan_in::FanOutFanInPipeline;
pub use naive::NaivePipeline;
pub use sources::open_source;
pub use squares::SquaresPipeline;

use std::time::Duration;

use crate::config::Config;
use crate::engine::{take, PipelineContext, DEADLINE_REASON, TAKE_REASON};
use crate::errors::PipelineError;
use crate::stream::Stream;

/// Cancellation reason recorded once a runner has drained its terminal stream.
pub const DRAINED_REASON: &str = "drained";

/// Settings shared by every runner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSettings {
    /// Values to keep before cancelling; `None` drains a finite source.
    pub take: Option<usize>,
    /// Cancel the run once this much time has passed.
    pub deadline: Option<Duration>,
}

impl RunSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            take: cfg.take,
            deadline: cfg.options.timeout(),
        }
    }

    fn arm(&self, ctx: &PipelineContext) {
        if let Some(deadline) = self.deadline {
            ctx.cancel_after(deadline);
        }
    }

    async fn drain(&self, ctx: &PipelineContext, terminal: Stream<u64>) -> Vec<u64> {
        let values = match self.take {
            Some(n) => take(ctx, terminal, n).collect().await,
            None => terminal.collect().await,
        };
        // Stops the deadline worker; a no-op when `take` already cancelled.
        ctx.cancel(DRAINED_REASON);
        values
    }

    fn settle(&self, ctx: &PipelineContext, values: Vec<u64>) -> Result<Vec<u64>, PipelineError> {
        match ctx.cancel_reason() {
            None | Some(TAKE_REASON) | Some(DRAINED_REASON) => Ok(values),
            // Fired after the terminal stream had already ended.
            Some(DEADLINE_REASON) if !ctx.interrupted_work() => Ok(values),
            Some(DEADLINE_REASON) => Err(PipelineError::DeadlineExceeded {
                deadline: self.deadline.unwrap_or_default(),
                collected: values.len(),
            }),
            Some(reason) => Err(PipelineError::Cancelled {
                reason,
                collected: values.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{from_iter, generator, map, stage};
    use crate::functions::counter;

    fn settings(deadline: Duration) -> RunSettings {
        RunSettings {
            take: None,
            deadline: Some(deadline),
        }
    }

    #[tokio::test]
    async fn test_deadline_after_a_finished_drain_is_not_a_failure() {
        let ctx = PipelineContext::new("finished_first");
        let settings = settings(Duration::from_millis(50));
        let terminal = map(&ctx, from_iter(&ctx, vec![1u64, 2, 3]), |n| n * 10);

        let values = terminal.collect().await;
        assert!(ctx.wait_for_workers(Duration::from_secs(1)).await);

        // The deadline wins the race against the drained marker.
        assert!(ctx.cancel(DEADLINE_REASON));
        assert_eq!(settings.settle(&ctx, values).unwrap(), vec![10, 20, 30]);
    }

    #[tokio::test]
    async fn test_deadline_that_stops_workers_is_reported() {
        let ctx = PipelineContext::new("cut_short");
        let settings = settings(Duration::from_millis(20));
        settings.arm(&ctx);

        let terminal = stage(&ctx, generator(&ctx, counter(0)), |_| None::<u64>);
        let values = settings.drain(&ctx, terminal).await;

        assert!(ctx.interrupted_work());
        assert!(matches!(
            settings.settle(&ctx, values),
            Err(PipelineError::DeadlineExceeded { collected: 0, .. })
        ));
    }
}
