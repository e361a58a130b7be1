// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use dbxd_core::Action;

fn job(id: &str) -> QueuedJob {
    QueuedJob {
        job_id: JobId::new(id),
        action: Action::EnableSsh,
        pup_id: None,
    }
}

#[test]
fn pump_on_empty_queue_does_not_take_the_slot() {
    let q = Queue::new();
    assert!(q.pump().is_none());
    assert!(!q.is_in_flight());
}

#[test]
fn pump_pops_head_in_fifo_order_and_holds_the_slot() {
    let q = Queue::new();
    q.enqueue(job("a"));
    q.enqueue(job("b"));

    let first = q.pump().unwrap();
    assert_eq!(first.job_id, JobId::new("a"));
    assert!(q.is_in_flight());
    assert!(q.last_dequeue_at().is_some());

    // Slot already held: a second pump is a no-op even though "b" is queued.
    assert!(q.pump().is_none());
    assert_eq!(q.len(), 1);
}

#[test]
fn release_frees_the_slot_for_the_next_pump() {
    let q = Queue::new();
    q.enqueue(job("a"));
    q.enqueue(job("b"));

    q.pump().unwrap();
    q.release();
    assert!(!q.is_in_flight());

    let second = q.pump().unwrap();
    assert_eq!(second.job_id, JobId::new("b"));
}

#[test]
fn enqueue_after_slot_taken_is_still_observed_on_next_pump() {
    let q = Queue::new();
    q.enqueue(job("a"));
    q.pump().unwrap();
    q.enqueue(job("b"));
    q.release();

    assert_eq!(q.pump().unwrap().job_id, JobId::new("b"));
}
