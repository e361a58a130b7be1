// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn new_leaves_seq_and_ts_zero_for_the_bus_to_fill_in() {
    let c = Change::new("job-1", ChangeType::JobCreated, serde_json::json!({}));
    assert_eq!(c.seq, 0);
    assert_eq!(c.ts_ms, 0);
}

#[test]
fn job_lifecycle_changes_are_never_low_priority() {
    for ty in [
        ChangeType::JobCreated,
        ChangeType::JobUpdated,
        ChangeType::JobCompleted,
        ChangeType::JobFailed,
        ChangeType::JobCancelled,
    ] {
        assert!(ty.is_job_lifecycle());
        assert!(!ty.is_low_priority());
    }
}

#[test]
fn progress_and_stats_are_low_priority() {
    assert!(ChangeType::Progress.is_low_priority());
    assert!(ChangeType::Stats.is_low_priority());
    assert!(!ChangeType::Progress.is_job_lifecycle());
}
