// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction so job timing logic can be driven deterministically
//! in tests instead of racing the wall clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Source of time for the engine. Production code uses [`SystemClock`];
/// tests use [`FakeClock`] to assert exact elapsed durations and
/// timestamps without sleeping.
pub trait Clock: Clone + Send + Sync + 'static {
    /// Milliseconds since the Unix epoch.
    fn epoch_ms(&self) -> u64;

    /// A monotonic instant, for elapsed-time measurements.
    fn now(&self) -> Instant;
}

/// Real wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn epoch_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }

    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Deterministic clock for tests: `epoch_ms` starts at an arbitrary base
/// and only advances when told to.
#[derive(Debug, Clone)]
pub struct FakeClock {
    epoch_ms: Arc<AtomicU64>,
    base_instant: Instant,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::at(1_700_000_000_000)
    }

    pub fn at(epoch_ms: u64) -> Self {
        Self {
            epoch_ms: Arc::new(AtomicU64::new(epoch_ms)),
            base_instant: Instant::now(),
        }
    }

    pub fn advance_ms(&self, millis: u64) {
        self.epoch_ms.fetch_add(millis, Ordering::SeqCst);
    }

    pub fn set_epoch_ms(&self, epoch_ms: u64) {
        self.epoch_ms.store(epoch_ms, Ordering::SeqCst);
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn epoch_ms(&self) -> u64 {
        self.epoch_ms.load(Ordering::SeqCst)
    }

    fn now(&self) -> Instant {
        // Instant can't be faked directly; tests that need elapsed-time
        // control should assert on epoch_ms deltas instead.
        self.base_instant
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
