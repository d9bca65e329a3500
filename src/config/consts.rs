// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::Duration;

/// Fan-out width used when available parallelism cannot be detected
pub const FALLBACK_FAN_OUT_WIDTH: usize = 4;
/// How long a finished run waits for its workers to observe cancellation
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Fan-out width when the config does not set one: one replica per core.
pub fn default_fan_out_width() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(FALLBACK_FAN_OUT_WIDTH)
}
