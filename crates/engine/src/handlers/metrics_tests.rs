// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use dbxd_adapters::{FakePupManager, PupManagerCall, PupState};

#[tokio::test]
async fn forwards_metrics_to_the_pup_manager() {
    let pup_manager = FakePupManager::new();
    pup_manager.seed(PupState::new("pup-1", "plex", "1.0", "core"));

    let mut metrics = std::collections::HashMap::new();
    metrics.insert("cpu".to_string(), "12".to_string());
    update_metrics(&pup_manager, "pup-1", metrics).await;

    assert!(matches!(
        pup_manager.calls().as_slice(),
        [PupManagerCall::UpdateMetrics(id)] if id == "pup-1"
    ));
}

#[tokio::test]
async fn never_panics_for_an_unseeded_pup() {
    let pup_manager = FakePupManager::new();
    update_metrics(&pup_manager, "missing", Default::default()).await;
}
