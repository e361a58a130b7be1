// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `UpdateMetrics`: fire-and-forget metrics ingestion. Never tracked,
//! never emitted as a job — the dispatcher just logs a failure if one
//! occurs.

use std::collections::HashMap;

use dbxd_adapters::PupManager;

pub async fn update_metrics<P: PupManager>(pup_manager: &P, pup_id: &str, metrics: HashMap<String, String>) {
    if let Err(e) = pup_manager.update_metrics(pup_id, metrics).await {
        tracing::warn!(pup_id, error = %e, "failed to record pup metrics");
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
