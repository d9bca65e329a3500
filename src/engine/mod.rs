// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pipeline constructors.
//!
//! Each constructor starts its worker(s) on the tokio runtime and returns the
//! read side of the stream they write:
//!
//! ```text
//! generator --> stage* --> fan_out(stage, k) --> fan_in --> take(n) --> consumer
//! ```
//!
//! All of them take the pipeline's [`PipelineContext`], which carries the shared
//! cancellation signal and tracks the workers.
//!
//! # Example
//! ```rust
//! use the_spillway::engine::{fan_in, fan_out, generator, take, PipelineContext};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let ctx = PipelineContext::new("multiples_of_seven");
//! let mut next = 0u64;
//! let numbers = generator(&ctx, move || {
//!     next += 1;
//!     next
//! });
//!
//! let replicas = fan_out(&ctx, numbers, |n| (n % 7 == 0).then_some(n), 3);
//! let values = take(&ctx, fan_in(&ctx, replicas), 5).collect().await;
//!
//! assert_eq!(values.len(), 5);
//! assert!(values.iter().all(|n| n % 7 == 0));
//! # }
//! ```

mod context;
mod fan_in;
mod fan_out;
mod generator;
mod stage;
mod take;
#[cfg(test)]
mod integration_tests;

pub use context::{PipelineContext, WorkerRole, DEADLINE_REASON};
pub use fan_in::{fan_in, JoinCounter};
pub use fan_out::fan_out;
pub use generator::{from_iter, generator, ticker, try_generator};
pub use stage::{map, stage};
pub use take::{take, TAKE_REASON};
