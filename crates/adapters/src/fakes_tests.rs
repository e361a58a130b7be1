// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::*;
use std::collections::HashMap;

#[tokio::test]
async fn fake_pup_manager_adopt_then_get_round_trips() {
    let mgr = FakePupManager::new();
    let manifest = PupManifest {
        name: "plex".to_string(),
        version: "1.0".to_string(),
        config_fields: vec![],
    };
    let source = Source { id: "core".to_string() };
    let id = mgr.adopt(&manifest, &source, &HashMap::new()).await.unwrap();
    let (state, _stats) = mgr.get(&id).await.unwrap();
    assert_eq!(state.name, "plex");
    assert!(matches!(mgr.calls()[0], PupManagerCall::Adopt { .. }));
}

#[tokio::test]
async fn fake_pup_manager_adopt_can_be_made_to_fail() {
    let mgr = FakePupManager::new();
    mgr.set_adopt_should_fail(true);
    let manifest = PupManifest {
        name: "plex".to_string(),
        version: "1.0".to_string(),
        config_fields: vec![],
    };
    let source = Source { id: "core".to_string() };
    let err = mgr.adopt(&manifest, &source, &HashMap::new()).await.unwrap_err();
    assert!(matches!(err, AdapterError::AdoptFailed(_)));
}

#[tokio::test]
async fn fake_pup_manager_set_config_clears_needs_conf() {
    let mgr = FakePupManager::new();
    let mut state = PupState::new("pup-1", "plex", "1.0", "core");
    state.needs_conf = true;
    mgr.seed(state);

    let mut values = HashMap::new();
    values.insert("PORT".to_string(), "22555".to_string());
    let updated = mgr.update_pup("pup-1", PupMutation::SetConfig(values)).await.unwrap();
    assert!(!updated.needs_conf);
    assert!(updated.config_saved);
}

#[tokio::test]
async fn fake_source_manager_resolves_registered_manifests_only() {
    let sources = FakeSourceManager::new();
    sources.register("core", "plex", vec![]);

    assert!(sources.get_source_manifest("core", "plex", "1.0").await.is_ok());
    let err = sources.get_source_manifest("core", "unknown", "1.0").await.unwrap_err();
    assert!(matches!(err, AdapterError::ResolveFailed(_)));
}

#[tokio::test]
async fn fake_nix_manager_apply_records_staged_writes() {
    let nix = FakeNixManager::new();
    let mut patch = nix.new_patch();
    let state = PupState::new("pup-1", "plex", "1.0", "core");
    patch.write_pup_file(&state, &HostState::default());
    patch.update_system_container_configuration();
    nix.apply(patch).await.unwrap();

    let calls = nix.calls();
    let NixCall::Apply(applied) = &calls[0];
    assert_eq!(applied.writes, vec!["pup:pup-1", "system-container"]);
}

#[tokio::test]
async fn fake_nix_manager_apply_can_be_made_to_fail() {
    let nix = FakeNixManager::new();
    nix.set_apply_should_fail(true);
    let err = nix.apply(nix.new_patch()).await.unwrap_err();
    assert!(matches!(err, AdapterError::ApplyFailed(_)));
}

#[tokio::test]
async fn fake_system_updater_runs_jobs_and_can_fail_next() {
    let updater = FakeSystemUpdater::new();
    let outcome = updater.run(&dbxd_core::Action::EnableSsh, None).await;
    assert!(outcome.error.is_none());

    updater.fail_next("boom");
    let outcome = updater.run(&dbxd_core::Action::DisableSsh, None).await;
    assert_eq!(outcome.error.as_deref(), Some("boom"));
}
