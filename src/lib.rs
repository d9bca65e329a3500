// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;     // config loading + runtime
pub mod engine;     // pipeline constructors
pub mod errors;     // error handling
pub mod functions;  // producers and stage functions
pub mod observability;
pub mod pipelines;  // ready-made runners
pub mod signal;     // cancellation
pub mod stream;     // single-writer streams
pub mod traits;     // unified abstractions
