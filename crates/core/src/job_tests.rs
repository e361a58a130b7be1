// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn new_job_carries_action_and_start_time() {
    let job = Job::new(
        JobConfig {
            id: JobId::new("job-1"),
            action: Action::EnableSsh,
        },
        1_000,
    );
    assert_eq!(job.started_ms, 1_000);
    assert_eq!(job.action, Action::EnableSsh);
    assert!(job.err.is_none());
    assert!(job.success.is_none());
}

#[test]
fn pup_id_prefers_attached_snapshot() {
    let job = Job::new(
        JobConfig {
            id: JobId::new("job-1"),
            action: Action::InstallPup {
                name: "plex".into(),
                version: "1".into(),
                source_id: "core".into(),
                options: Default::default(),
            },
        },
        0,
    )
    .with_pup_state(serde_json::json!({"id": "pup-xyz"}));

    assert_eq!(job.pup_id().as_deref(), Some("pup-xyz"));
}

#[test]
fn pup_id_falls_back_to_action() {
    let job = Job::new(
        JobConfig {
            id: JobId::new("job-1"),
            action: Action::DisablePup {
                pup_id: "pup-1".into(),
            },
        },
        0,
    );
    assert_eq!(job.pup_id().as_deref(), Some("pup-1"));
}
