// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use dbxd_core::ActionProgress;

fn record(id: &str, started_ms: u64) -> JobRecord {
    JobRecord::new(JobId::new(id), format!("Install {id}"), Some(id.to_string()), started_ms)
}

#[test]
fn put_then_get_round_trips() {
    let store = JobStore::open_in_memory().unwrap();
    let r = record("job-1", 1_000);
    store.put(&r).unwrap();
    assert_eq!(store.get(&r.id).unwrap(), Some(r));
}

#[test]
fn get_missing_returns_none() {
    let store = JobStore::open_in_memory().unwrap();
    assert_eq!(store.get(&JobId::new("nope")).unwrap(), None);
}

#[test]
fn put_overwrites_existing_row() {
    let store = JobStore::open_in_memory().unwrap();
    let mut r = record("job-1", 1_000);
    store.put(&r).unwrap();
    r.apply_progress(&ActionProgress::new(r.id.clone(), "step", "halfway").with_progress(50));
    store.put(&r).unwrap();
    assert_eq!(store.get(&r.id).unwrap().unwrap().progress, 50);
}

#[test]
fn get_active_excludes_terminal_and_orders_oldest_first() {
    let store = JobStore::open_in_memory().unwrap();
    let mut done = record("job-done", 500);
    done.complete(None, 600);
    store.put(&done).unwrap();
    store.put(&record("job-2", 2_000)).unwrap();
    store.put(&record("job-1", 1_000)).unwrap();

    let active = store.get_active().unwrap();
    let ids: Vec<_> = active.iter().map(|r| r.id.as_str().to_string()).collect();
    assert_eq!(ids, vec!["job-1", "job-2"]);
}

#[test]
fn get_recent_only_returns_terminal_newest_first_and_respects_limit() {
    let store = JobStore::open_in_memory().unwrap();
    store.put(&record("job-active", 1_000)).unwrap();

    let mut older = record("job-older", 1_000);
    older.complete(None, 2_000);
    store.put(&older).unwrap();

    let mut newer = record("job-newer", 1_500);
    newer.complete(None, 3_000);
    store.put(&newer).unwrap();

    let recent = store.get_recent(1).unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, JobId::new("job-newer"));
}

#[test]
fn clear_completed_removes_only_old_terminal_rows() {
    let store = JobStore::open_in_memory().unwrap();

    let mut old = record("job-old", 0);
    old.complete(None, 1_000);
    store.put(&old).unwrap();

    let mut fresh = record("job-fresh", 0);
    fresh.complete(None, 9_000);
    store.put(&fresh).unwrap();

    store.put(&record("job-active", 0)).unwrap();

    let removed = store.clear_completed(10_000, 5_000).unwrap();
    assert_eq!(removed, 1);
    assert_eq!(store.get(&JobId::new("job-old")).unwrap(), None);
    assert!(store.get(&JobId::new("job-fresh")).unwrap().is_some());
    assert!(store.get(&JobId::new("job-active")).unwrap().is_some());
}

#[test]
fn clear_all_wipes_every_row() {
    let store = JobStore::open_in_memory().unwrap();
    store.put(&record("job-1", 0)).unwrap();
    let mut terminal = record("job-2", 0);
    terminal.complete(None, 10);
    store.put(&terminal).unwrap();

    store.clear_all().unwrap();
    assert!(store.get_all().unwrap().is_empty());
}

#[test]
fn clear_orphaned_fails_stale_active_jobs_and_leaves_recent_ones() {
    let store = JobStore::open_in_memory().unwrap();
    store.put(&record("job-stale", 0)).unwrap();
    store.put(&record("job-fresh", 9_000)).unwrap();

    let touched = store.clear_orphaned(10_000, 5_000).unwrap();
    assert_eq!(touched, vec![JobId::new("job-stale")]);

    let stale = store.get(&JobId::new("job-stale")).unwrap().unwrap();
    assert_eq!(stale.status, dbxd_core::JobStatus::Failed);
    assert_eq!(stale.error_message, "Job was orphaned (stuck in queue)");

    let fresh = store.get(&JobId::new("job-fresh")).unwrap().unwrap();
    assert_eq!(fresh.status, dbxd_core::JobStatus::Queued);
}

#[test]
fn is_active_reflects_status() {
    let store = JobStore::open_in_memory().unwrap();
    store.put(&record("job-1", 0)).unwrap();
    assert!(store.is_active(&JobId::new("job-1")).unwrap());

    let mut done = record("job-2", 0);
    done.complete(None, 10);
    store.put(&done).unwrap();
    assert!(!store.is_active(&JobId::new("job-2")).unwrap());

    assert!(!store.is_active(&JobId::new("missing")).unwrap());
}
