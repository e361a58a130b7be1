// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `UpdatePupConfig`: edit a pup's saved configuration and push the
//! result out through a declarative-configuration patch, synchronously
//! from the dispatcher's perspective.

use std::collections::HashMap;

use dbxd_adapters::{JobOutcome, NixManager, Patch, PupManager, PupMutation, StateManager};

/// 1. Snapshot the old state to know whether this pup was missing
///    required config before the edit.
/// 2. Apply `SetConfig`; the pup manager is responsible for rejecting
///    unknown keys and coercing values per field type.
/// 3. If the pup no longer needs config or dependencies and wasn't
///    already enabled, auto-enable it.
/// 4. Stage and apply a patch for this pup's declarative file.
pub async fn update_pup_config<P, N, S>(
    pup_manager: &P,
    nix_manager: &N,
    state_manager: &S,
    pup_id: &str,
    values: HashMap<String, String>,
) -> JobOutcome
where
    P: PupManager,
    N: NixManager,
    S: StateManager,
{
    let old_state = match pup_manager.get(pup_id).await {
        Ok((state, _stats)) => state,
        Err(e) => return JobOutcome::failure(e.to_string()),
    };
    let was_needing_config = old_state.needs_conf;

    let mut new_state = match pup_manager.update_pup(pup_id, PupMutation::SetConfig(values)).await {
        Ok(state) => state,
        Err(e) => return JobOutcome::failure(e.to_string()),
    };

    let health_now = pup_manager.health_of(&new_state);
    if was_needing_config && !health_now.needs_conf && !health_now.needs_deps && !new_state.enabled {
        match pup_manager.update_pup(pup_id, PupMutation::SetEnabled(true)).await {
            Ok(state) => new_state = state,
            Err(e) => return JobOutcome::failure(e.to_string()),
        }
    }

    let host_state = state_manager.get().await;
    let mut patch = nix_manager.new_patch();
    patch.write_pup_file(&new_state, &host_state);
    if let Err(e) = nix_manager.apply(patch).await {
        return JobOutcome::failure(e.to_string());
    }

    JobOutcome::success(Some(new_state))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
