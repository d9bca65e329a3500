// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Typed transport between pipeline workers.
//!
//! A stream is a single-writer sequence with a one-value buffer. The write side,
//! [`StreamWriter`], is not `Clone`; the stream reaches end-of-stream exactly once,
//! when that writer is dropped. Readers see only "next value or end-of-stream".
//!
//! * [`Stream`] - the read side owned by one consumer
//! * [`SharedStream`] - a cloneable read side for several competing consumers
//! * [`Upstream`] - what a worker reads from, either of the above

mod channel;
mod shared;

pub use channel::{channel, Delivery, Reservation, SendSlot, Stream, StreamWriter};
pub use shared::SharedStream;

use async_trait::async_trait;

use crate::signal::CancellationObserver;

/// Values buffered between a writer and its reader.
pub const STREAM_CAPACITY: usize = 1;

/// Outcome of a cancellable read.
#[derive(Debug, PartialEq, Eq)]
pub enum Next<T> {
    Item(T),
    End,
    Cancelled,
}

impl<T> Next<T> {
    pub fn into_item(self) -> Option<T> {
        match self {
            Next::Item(value) => Some(value),
            Next::End | Next::Cancelled => None,
        }
    }
}

impl<T> From<Option<T>> for Next<T> {
    fn from(item: Option<T>) -> Self {
        match item {
            Some(value) => Next::Item(value),
            None => Next::End,
        }
    }
}

/// Read side a worker consumes from.
#[async_trait]
pub trait Upstream<T>: Send {
    /// Race the next read against cancellation.
    async fn next(&mut self, observer: &CancellationObserver) -> Next<T>;
}
