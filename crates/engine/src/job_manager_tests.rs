// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use dbxd_core::{Action, FakeClock};

fn manager() -> JobManager<FakeClock> {
    let store = Arc::new(JobStore::open_in_memory().unwrap());
    JobManager::new(store, FakeClock::at(1_000))
}

fn install_action() -> Action {
    Action::InstallPup {
        name: "plex".to_string(),
        version: "1.0".to_string(),
        source_id: "core".to_string(),
        options: Default::default(),
    }
}

#[test]
fn create_inserts_queued_record_with_display_name() {
    let mgr = manager();
    let id = JobId::new("job-1");
    let record = mgr.create(id.clone(), &install_action(), None, None).unwrap();
    assert_eq!(record.status, dbxd_core::JobStatus::Queued);
    assert_eq!(record.display_name, "Install plex");
    assert!(mgr.is_active(&id));
}

#[test]
fn create_uses_pup_name_not_pup_id_for_display_name() {
    let mgr = manager();
    let id = JobId::new("job-1");
    let action = Action::UninstallPup { pup_id: "pup-1".to_string() };
    let record = mgr.create(id, &action, Some("pup-1".to_string()), Some("plex")).unwrap();
    assert_eq!(record.display_name, "Uninstall plex");
    assert_eq!(record.pup_id.as_deref(), Some("pup-1"));
}

#[test]
fn update_progress_on_unknown_job_is_not_found() {
    let mgr = manager();
    let ap = ActionProgress::new(JobId::new("nope"), "step", "msg");
    assert!(matches!(mgr.update_progress(&ap), Err(CoreError::NotFound(_))));
}

#[test]
fn complete_moves_job_out_of_active_cache() {
    let mgr = manager();
    let id = JobId::new("job-1");
    mgr.create(id.clone(), &install_action(), None, None).unwrap();
    mgr.complete(&id, None).unwrap();
    assert!(!mgr.is_active(&id));
    assert_eq!(mgr.get(&id).unwrap().unwrap().status, dbxd_core::JobStatus::Completed);
}

#[test]
fn complete_is_idempotent_for_inactive_id() {
    let mgr = manager();
    assert_eq!(mgr.complete(&JobId::new("missing"), None).unwrap(), None);
}

#[test]
fn cancel_errors_when_job_not_active() {
    let mgr = manager();
    assert!(mgr.cancel(&JobId::new("missing")).is_err());
}

#[test]
fn sync_with_active_jobs_rebuilds_cache_from_store() {
    let store = Arc::new(JobStore::open_in_memory().unwrap());
    let mgr = JobManager::new(Arc::clone(&store), FakeClock::at(1_000));
    let id = JobId::new("job-1");
    mgr.create(id.clone(), &install_action(), None, None).unwrap();

    let mgr2 = JobManager::new(store, FakeClock::at(2_000));
    assert!(!mgr2.is_active(&id));
    mgr2.sync_with_active_jobs().unwrap();
    assert!(mgr2.is_active(&id));
}

#[test]
fn clear_orphaned_evicts_from_cache_and_fails_the_record() {
    let clock = FakeClock::at(0);
    let store = Arc::new(JobStore::open_in_memory().unwrap());
    let mgr = JobManager::new(Arc::clone(&store), clock.clone());
    let id = JobId::new("job-1");
    mgr.create(id.clone(), &install_action(), None, None).unwrap();

    clock.set_epoch_ms(2 * 60 * 60 * 1000);
    let touched = mgr.clear_orphaned(30 * 60 * 1000).unwrap();
    assert_eq!(touched, vec![id.clone()]);
    assert!(!mgr.is_active(&id));
    let record = mgr.get(&id).unwrap().unwrap();
    assert_eq!(record.status, dbxd_core::JobStatus::Failed);
    assert_eq!(record.error_message, "Job was orphaned (stuck in queue)");
}

#[test]
fn clear_all_empties_cache_and_store() {
    let mgr = manager();
    mgr.create(JobId::new("job-1"), &install_action(), None, None).unwrap();
    mgr.clear_all().unwrap();
    assert!(mgr.get_all().unwrap().is_empty());
    assert!(!mgr.is_active(&JobId::new("job-1")));
}
