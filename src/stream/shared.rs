// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

use super::{Next, Upstream};
use crate::signal::CancellationObserver;

/// Read side of one stream shared by competing consumers.
///
/// Every clone reads from the same underlying stream; each value goes to exactly
/// one of them. Which consumer wins a given value is up to the scheduler.
#[derive(Debug)]
pub struct SharedStream<T> {
    inner: Arc<Mutex<mpsc::Receiver<T>>>,
}

impl<T> SharedStream<T> {
    pub(super) fn new(rx: mpsc::Receiver<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(rx)),
        }
    }

    /// Number of read handles currently alive.
    pub fn readers(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl<T> Clone for SharedStream<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl<T: Send> Upstream<T> for SharedStream<T> {
    async fn next(&mut self, observer: &CancellationObserver) -> Next<T> {
        // Waiting for the lock counts as waiting for a value, so both sit
        // inside the same race.
        tokio::select! {
            biased;
            _ = observer.cut_short() => Next::Cancelled,
            item = async { self.inner.lock().await.recv().await } => item.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::CancellationSignal;
    use crate::stream::{channel, Delivery};
    use std::collections::HashSet;
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_each_value_reaches_exactly_one_reader() {
        let signal = CancellationSignal::new();
        let (writer, stream) = channel();
        let shared = stream.into_shared();

        let producer_observer = signal.observer();
        tokio::spawn(async move {
            for value in 0..200u32 {
                if writer.send(value, &producer_observer).await != Delivery::Delivered {
                    break;
                }
            }
        });

        let readers: Vec<_> = (0..3)
            .map(|_| {
                let mut reader = shared.clone();
                let observer = signal.observer();
                tokio::spawn(async move {
                    let mut seen = Vec::new();
                    while let Next::Item(value) = reader.next(&observer).await {
                        seen.push(value);
                    }
                    seen
                })
            })
            .collect();
        drop(shared);

        let mut all = Vec::new();
        for reader in readers {
            all.extend(reader.await.unwrap());
        }

        assert_eq!(all.len(), 200);
        let distinct: HashSet<_> = all.iter().copied().collect();
        assert_eq!(distinct.len(), 200);
    }

    #[tokio::test]
    async fn test_waiting_readers_leave_on_cancel() {
        let signal = CancellationSignal::new();
        let (_writer, stream) = channel::<u32>();
        let shared = stream.into_shared();
        assert_eq!(shared.readers(), 1);

        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let mut reader = shared.clone();
                let observer = signal.observer();
                tokio::spawn(async move { reader.next(&observer).await })
            })
            .collect();

        tokio::time::sleep(Duration::from_millis(20)).await;
        signal.cancel();

        for waiter in waiters {
            let outcome = tokio::time::timeout(Duration::from_secs(1), waiter)
                .await
                .expect("reader should stop waiting")
                .unwrap();
            assert_eq!(outcome, Next::Cancelled);
        }
        assert_eq!(shared.readers(), 1);
    }
}
