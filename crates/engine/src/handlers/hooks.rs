// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `UpdatePupHooks`: mutate hooks in place. No patch apply, no job —
//! the dispatcher emits completion straight from the result.

use dbxd_adapters::{JobOutcome, PupManager, PupMutation};

pub async fn update_pup_hooks<P: PupManager>(pup_manager: &P, pup_id: &str, hooks: Vec<String>) -> JobOutcome {
    match pup_manager.update_pup(pup_id, PupMutation::SetHooks(hooks)).await {
        Ok(state) => JobOutcome::success(Some(state)),
        Err(e) => JobOutcome::failure(e.to_string()),
    }
}

#[cfg(test)]
#[path = "hooks_tests.rs"]
mod tests;
