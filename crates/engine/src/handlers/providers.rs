// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `UpdatePupProviders`: merge provider bindings into a pup's state.
//! Only rewrites the declarative configuration if the pup can actually
//! start with the new bindings — otherwise there's nothing to apply yet.

use std::collections::HashMap;

use dbxd_adapters::{JobOutcome, NixManager, Patch, PupManager, PupMutation, StateManager};

pub async fn update_pup_providers<P, N, S>(
    pup_manager: &P,
    nix_manager: &N,
    state_manager: &S,
    pup_id: &str,
    providers: HashMap<String, String>,
) -> JobOutcome
where
    P: PupManager,
    N: NixManager,
    S: StateManager,
{
    let new_state = match pup_manager.update_pup(pup_id, PupMutation::SetProviders(providers)).await {
        Ok(state) => state,
        Err(e) => return JobOutcome::failure(e.to_string()),
    };

    // A `can_start` error is treated the same as `Ok(false)`: it isn't
    // ready to start yet, not a reason to fail the job.
    let can_start = pup_manager.can_start(pup_id).await.unwrap_or(false);
    if !can_start {
        return JobOutcome::success(Some(new_state));
    }

    let host_state = state_manager.get().await;
    let mut patch = nix_manager.new_patch();
    patch.update_system_container_configuration();
    patch.write_pup_file(&new_state, &host_state);
    if let Err(e) = nix_manager.apply(patch).await {
        return JobOutcome::failure(e.to_string());
    }

    JobOutcome::success(Some(new_state))
}

#[cfg(test)]
#[path = "providers_tests.rs"]
mod tests;
