// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use dbxd_adapters::{FakePupManager, PupState};

#[tokio::test]
async fn replaces_the_hooks_list() {
    let pup_manager = FakePupManager::new();
    pup_manager.seed(PupState::new("pup-1", "plex", "1.0", "core"));

    let outcome = update_pup_hooks(&pup_manager, "pup-1", vec!["pre-start".to_string()]).await;

    assert_eq!(outcome.pup_state.unwrap().hooks, vec!["pre-start".to_string()]);
}

#[tokio::test]
async fn unknown_pup_fails() {
    let pup_manager = FakePupManager::new();
    let outcome = update_pup_hooks(&pup_manager, "missing", vec![]).await;
    assert!(outcome.error.is_some());
}
