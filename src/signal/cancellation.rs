// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Broadcast-once cancellation shared by every worker of a pipeline.
//!
//! The signal has two states, `Active` and `Cancelled`, and moves from the first
//! to the second at most once. Holders of a [`CancellationSignal`] may trigger the
//! transition; workers only ever receive a [`CancellationObserver`], which can wait
//! for the transition but has no way to cause it.
//!
//! Observation is level-triggered: once cancelled, every current and future
//! `cancelled().await` completes immediately.
//!
//! # Example
//! ```rust
//! use the_spillway::signal::CancellationSignal;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let signal = CancellationSignal::new();
//! let observer = signal.observer();
//!
//! assert!(signal.cancel());   // performed the transition
//! assert!(!signal.cancel());  // redundant trigger is a no-op
//!
//! observer.cancelled().await; // already cancelled, returns immediately
//! assert!(observer.is_cancelled());
//! # }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Owner-side handle of a cancellation signal.
#[derive(Clone, Debug, Default)]
pub struct CancellationSignal {
    token: CancellationToken,
    triggered: Arc<AtomicBool>,
    interrupted: Arc<AtomicBool>,
}

impl CancellationSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the signal to `Cancelled`.
    ///
    /// Returns `true` only for the single call that performed the transition.
    /// Every later (or concurrent, losing) call returns `false` and has no effect.
    pub fn cancel(&self) -> bool {
        let first = !self.triggered.swap(true, Ordering::AcqRel);
        self.token.cancel();
        first
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Whether cancellation cut short at least one observer's wait.
    ///
    /// Stays `false` when the signal flipped only after every worker had
    /// already finished on its own.
    pub fn interrupted_work(&self) -> bool {
        self.interrupted.load(Ordering::Acquire)
    }

    /// Read-only view handed to workers.
    pub fn observer(&self) -> CancellationObserver {
        CancellationObserver {
            token: self.token.clone(),
            interrupted: Arc::clone(&self.interrupted),
        }
    }

    /// Guard that cancels the signal when the owning scope ends.
    pub fn cancel_on_drop(&self) -> CancelOnDrop {
        CancelOnDrop {
            signal: Some(self.clone()),
        }
    }
}

/// Read-only capability to observe a [`CancellationSignal`].
#[derive(Clone, Debug)]
pub struct CancellationObserver {
    token: CancellationToken,
    interrupted: Arc<AtomicBool>,
}

impl CancellationObserver {
    /// Completes once the signal is cancelled (immediately if it already is).
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    /// Like [`cancelled`](Self::cancelled), for a wait that is abandoned when it
    /// completes. Records the abandoned work on the signal.
    pub(crate) async fn cut_short(&self) {
        self.token.cancelled().await;
        self.interrupted.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Cancels its signal on drop unless disarmed.
#[derive(Debug)]
#[must_use = "the signal is cancelled as soon as the guard is dropped"]
pub struct CancelOnDrop {
    signal: Option<CancellationSignal>,
}

impl CancelOnDrop {
    /// Release the signal without cancelling it.
    pub fn disarm(mut self) -> CancellationSignal {
        // Always Some until drop.
        self.signal.take().unwrap_or_default()
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if let Some(signal) = self.signal.take() {
            signal.cancel();
        }
    }
}
