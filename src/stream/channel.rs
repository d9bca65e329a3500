// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{Next, SharedStream, Upstream, STREAM_CAPACITY};
use crate::signal::CancellationObserver;

/// Create a connected writer/reader pair.
pub fn channel<T>() -> (StreamWriter<T>, Stream<T>) {
    let (tx, rx) = mpsc::channel(STREAM_CAPACITY);
    (StreamWriter { tx }, Stream { rx })
}

/// Read side of a stream.
#[derive(Debug)]
pub struct Stream<T> {
    rx: mpsc::Receiver<T>,
}

impl<T> Stream<T> {
    /// Next value, or `None` once the writer is gone and the buffer is empty.
    ///
    /// This read does not observe cancellation; it is meant for the terminal
    /// consumer of a pipeline, which always sees end-of-stream eventually.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Drain the stream until end-of-stream.
    pub async fn collect(mut self) -> Vec<T> {
        let mut values = Vec::new();
        while let Some(value) = self.rx.recv().await {
            values.push(value);
        }
        values
    }

    /// Turn this stream into a read side several consumers can compete on.
    pub fn into_shared(self) -> SharedStream<T> {
        SharedStream::new(self.rx)
    }
}

#[async_trait]
impl<T: Send> Upstream<T> for Stream<T> {
    async fn next(&mut self, observer: &CancellationObserver) -> Next<T> {
        tokio::select! {
            biased;
            _ = observer.cut_short() => Next::Cancelled,
            item = self.rx.recv() => item.into(),
        }
    }
}

/// Outcome of a cancellable write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    Cancelled,
    /// The reader is gone; nothing will ever be read again.
    Closed,
}

/// Write side of a stream. Dropping it closes the stream.
#[derive(Debug)]
pub struct StreamWriter<T> {
    tx: mpsc::Sender<T>,
}

impl<T> StreamWriter<T> {
    /// Wait for the reader to accept `value`, unless cancelled first.
    pub async fn send(&self, value: T, observer: &CancellationObserver) -> Delivery {
        tokio::select! {
            biased;
            _ = observer.cut_short() => Delivery::Cancelled,
            sent = self.tx.send(value) => match sent {
                Ok(()) => Delivery::Delivered,
                Err(_) => Delivery::Closed,
            },
        }
    }

    /// Wait for room in the stream before producing a value.
    ///
    /// A producer that reserves first never computes a value it cannot deliver.
    pub async fn reserve(&self, observer: &CancellationObserver) -> Reservation<'_, T> {
        tokio::select! {
            biased;
            _ = observer.cut_short() => Reservation::Cancelled,
            permit = self.tx.reserve() => match permit {
                Ok(permit) => Reservation::Ready(SendSlot { permit }),
                Err(_) => Reservation::Closed,
            },
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Additional write handle into the same stream.
    ///
    /// Only fan-in uses this; its coordinator keeps the original handle and drops
    /// it last, so closing stays a single, deliberate event.
    pub(crate) fn fork(&self) -> StreamWriter<T> {
        StreamWriter {
            tx: self.tx.clone(),
        }
    }
}

/// Result of [`StreamWriter::reserve`].
#[derive(Debug)]
pub enum Reservation<'a, T> {
    Ready(SendSlot<'a, T>),
    Cancelled,
    Closed,
}

/// A reserved place for exactly one value.
#[derive(Debug)]
pub struct SendSlot<'a, T> {
    permit: mpsc::Permit<'a, T>,
}

impl<T> SendSlot<'_, T> {
    pub fn write(self, value: T) {
        self.permit.send(value);
    }
}
