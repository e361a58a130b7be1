// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! FIFO of pending jobs with a single in-flight slot, fed by the
//! dispatcher's `dispatch` step and drained by its 100ms `pumpQueue`
//! tick. Global serialization of mutating work happens here: at most
//! one job ever owns the in-flight slot.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use dbxd_core::{Action, JobId};
use parking_lot::Mutex;

/// A job waiting for the updater, carrying what `dispatch` resolved.
#[derive(Debug, Clone)]
pub struct QueuedJob {
    pub job_id: JobId,
    pub action: Action,
    pub pup_id: Option<String>,
}

/// `{slice, fifoMutex, inFlightMutex, lastDequeueAt}`. Position 0 is the
/// head.
pub struct Queue {
    fifo: Mutex<VecDeque<QueuedJob>>,
    in_flight: AtomicBool,
    last_dequeue_at: Mutex<Option<Instant>>,
}

impl Queue {
    pub fn new() -> Self {
        Self {
            fifo: Mutex::new(VecDeque::new()),
            in_flight: AtomicBool::new(false),
            last_dequeue_at: Mutex::new(None),
        }
    }

    /// Append under `fifoMutex`.
    pub fn enqueue(&self, job: QueuedJob) {
        self.fifo.lock().push_back(job);
    }

    /// Try-lock the in-flight slot; if acquired and the queue is
    /// non-empty, pop the head and stamp `lastDequeueAt`. Returns `None`
    /// without taking the slot if it's already held, or if the queue
    /// was empty (the slot is released again in that case). The caller
    /// must call [`Queue::release`] once the updater reports completion.
    pub fn pump(&self) -> Option<QueuedJob> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return None;
        }
        let mut fifo = self.fifo.lock();
        match fifo.pop_front() {
            Some(job) => {
                *self.last_dequeue_at.lock() = Some(Instant::now());
                Some(job)
            }
            None => {
                self.in_flight.store(false, Ordering::Release);
                None
            }
        }
    }

    /// Release the in-flight slot. Called by the dispatcher on updater
    /// completion, or forcibly on shutdown once the in-flight job has
    /// been persisted as failed.
    pub fn release(&self) {
        self.in_flight.store(false, Ordering::Release);
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn last_dequeue_at(&self) -> Option<Instant> {
        *self.last_dequeue_at.lock()
    }

    pub fn len(&self) -> usize {
        self.fifo.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
