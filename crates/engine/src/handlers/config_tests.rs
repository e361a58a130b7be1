// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use dbxd_adapters::{FakeNixManager, FakePupManager, FakeStateManager, NixCall, PupState};

fn seeded(id: &str, needs_conf: bool) -> FakePupManager {
    let mgr = FakePupManager::new();
    let mut state = PupState::new(id, "plex", "1.0", "core");
    state.needs_conf = needs_conf;
    mgr.seed(state);
    mgr
}

#[tokio::test]
async fn saves_config_and_applies_a_patch() {
    let pup_manager = seeded("pup-1", false);
    let nix_manager = FakeNixManager::new();
    let state_manager = FakeStateManager::default();

    let mut values = std::collections::HashMap::new();
    values.insert("port".to_string(), "8080".to_string());

    let outcome = update_pup_config(&pup_manager, &nix_manager, &state_manager, "pup-1", values).await;

    assert!(outcome.error.is_none());
    let state = outcome.pup_state.unwrap();
    assert!(state.config_saved);
    assert_eq!(nix_manager.calls(), vec![NixCall::Apply(dbxd_adapters::FakePatch {
        writes: vec!["pup:pup-1".to_string()],
    })]);
}

#[tokio::test]
async fn auto_enables_once_config_and_deps_are_satisfied() {
    let pup_manager = seeded("pup-1", true);
    let nix_manager = FakeNixManager::new();
    let state_manager = FakeStateManager::default();

    let outcome = update_pup_config(&pup_manager, &nix_manager, &state_manager, "pup-1", Default::default()).await;

    let state = outcome.pup_state.unwrap();
    assert!(state.enabled);
}

#[tokio::test]
async fn does_not_auto_enable_when_deps_still_missing() {
    let pup_manager = FakePupManager::new();
    let mut state = PupState::new("pup-1", "plex", "1.0", "core");
    state.needs_conf = true;
    state.needs_deps = true;
    pup_manager.seed(state);
    let nix_manager = FakeNixManager::new();
    let state_manager = FakeStateManager::default();

    let outcome = update_pup_config(&pup_manager, &nix_manager, &state_manager, "pup-1", Default::default()).await;

    assert!(!outcome.pup_state.unwrap().enabled);
}

#[tokio::test]
async fn patch_apply_failure_fails_the_outcome() {
    let pup_manager = seeded("pup-1", false);
    let nix_manager = FakeNixManager::new();
    nix_manager.set_apply_should_fail(true);
    let state_manager = FakeStateManager::default();

    let outcome = update_pup_config(&pup_manager, &nix_manager, &state_manager, "pup-1", Default::default()).await;

    assert!(outcome.error.is_some());
}

#[tokio::test]
async fn unknown_pup_fails_the_outcome() {
    let pup_manager = FakePupManager::new();
    let nix_manager = FakeNixManager::new();
    let state_manager = FakeStateManager::default();

    let outcome = update_pup_config(&pup_manager, &nix_manager, &state_manager, "missing", Default::default()).await;

    assert!(outcome.error.is_some());
}
