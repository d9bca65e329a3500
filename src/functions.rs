// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Caller-side functions plugged into pipelines: producers and stage functions.

use rand::{Rng, SeedableRng};
use serde::Deserialize;

/// Trial division over odd candidates up to `sqrt(n)`.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut divisor = 3;
    while divisor <= n / divisor {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

pub fn is_even(n: u64) -> bool {
    n % 2 == 0
}

/// `None` when the square does not fit in a `u64`.
pub fn square(n: u64) -> Option<u64> {
    n.checked_mul(n)
}

/// Stage function selected by name in a config.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// Keep primes.
    Prime,
    /// Keep even numbers.
    Even,
    /// Replace each value with its square.
    Square,
    /// Forward everything unchanged.
    #[default]
    Identity,
}

impl FilterKind {
    pub fn apply(self, n: u64) -> Option<u64> {
        match self {
            FilterKind::Prime => is_prime(n).then_some(n),
            FilterKind::Even => is_even(n).then_some(n),
            FilterKind::Square => square(n),
            FilterKind::Identity => Some(n),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FilterKind::Prime => "prime",
            FilterKind::Even => "even",
            FilterKind::Square => "square",
            FilterKind::Identity => "identity",
        }
    }
}

/// Sequential counter: `start`, `start + 1`, ...
pub fn counter(start: u64) -> impl FnMut() -> u64 + Send + 'static {
    let mut next = start;
    move || {
        let value = next;
        next = next.wrapping_add(1);
        value
    }
}

/// Walks `start..end` over and over. `start < end` is required.
pub fn cycle(start: u64, end: u64) -> impl FnMut() -> u64 + Send + 'static {
    let mut next = start;
    move || {
        let value = next;
        next = if next + 1 >= end { start } else { next + 1 };
        value
    }
}

/// Uniform random values in `0..max`. `max > 0` is required.
pub fn random_below(max: u64) -> impl FnMut() -> u64 + Send + 'static {
    let mut rng = rand::rngs::StdRng::from_entropy();
    move || rng.gen_range(0..max)
}
