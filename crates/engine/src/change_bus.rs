// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single buffered channel of [`Change`] events fanned out to the
//! socket layer (external to this crate).
//!
//! Every emit stamps `seq`/`ts_ms`, then sends with a deadline: 200ms
//! normally, widened to 2s for job-lifecycle changes so a busy bus
//! never silently loses a `job:completed`/`job:failed`. `progress` and
//! `stats` are dropped outright on a full bus rather than waiting —
//! they're best-effort, and a completed job's terminal change is the
//! only thing a subscriber is guaranteed to eventually see.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dbxd_core::{Change, Clock};
use tokio::sync::mpsc::{self, error::TrySendError};

const BUS_CAPACITY: usize = 256;
const NORMAL_DEADLINE: Duration = Duration::from_millis(200);
const LIFECYCLE_DEADLINE: Duration = Duration::from_secs(2);

/// Sending half, cloned into every component that emits changes.
#[derive(Clone)]
pub struct ChangeBus {
    tx: mpsc::Sender<Change>,
    seq: std::sync::Arc<AtomicU64>,
}

impl ChangeBus {
    pub fn new() -> (Self, mpsc::Receiver<Change>) {
        let (tx, rx) = mpsc::channel(BUS_CAPACITY);
        (
            Self {
                tx,
                seq: std::sync::Arc::new(AtomicU64::new(0)),
            },
            rx,
        )
    }

    /// Stamp and send. Never blocks the caller beyond the relevant
    /// deadline; a dropped change is logged, not an error, since there
    /// is nothing a caller can usefully do about a full bus.
    pub async fn emit<C: Clock>(&self, clock: &C, mut change: Change) {
        change.seq = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
        change.ts_ms = clock.epoch_ms();
        let change_type = change.change_type;

        if change_type.is_low_priority() {
            if let Err(TrySendError::Full(_)) = self.tx.try_send(change) {
                tracing::warn!(?change_type, "change bus full, dropping low-priority change");
            }
            return;
        }

        let deadline = if change_type.is_job_lifecycle() {
            LIFECYCLE_DEADLINE
        } else {
            NORMAL_DEADLINE
        };
        match tokio::time::timeout(deadline, self.tx.send(change)).await {
            Ok(Ok(())) => {}
            Ok(Err(_)) => tracing::warn!("change bus receiver dropped"),
            Err(_) => tracing::warn!(?change_type, "change bus send deadline exceeded, dropping change"),
        }
    }
}

#[cfg(test)]
#[path = "change_bus_tests.rs"]
mod tests;
