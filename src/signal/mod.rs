// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod cancellation;

pub use cancellation::{CancelOnDrop, CancellationObserver, CancellationSignal};
