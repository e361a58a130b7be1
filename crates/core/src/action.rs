// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The closed set of user-issued intents the dispatcher understands.
//!
//! `Action` is a tagged variant (never an open-ended trait object) so the
//! dispatch table in the engine crate stays exhaustive-checkable: adding
//! a new intent is a compile error everywhere it isn't handled yet.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One element of a batch install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallPupSpec {
    pub name: String,
    pub version: String,
    pub source_id: String,
    #[serde(default)]
    pub options: HashMap<String, String>,
}

/// A user-issued intent. Input to `AddAction`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    InstallPup {
        name: String,
        version: String,
        source_id: String,
        #[serde(default)]
        options: HashMap<String, String>,
    },
    InstallPups(Vec<InstallPupSpec>),
    UninstallPup {
        pup_id: String,
    },
    PurgePup {
        pup_id: String,
    },
    EnablePup {
        pup_id: String,
    },
    DisablePup {
        pup_id: String,
    },
    UpgradePup {
        pup_id: String,
        target: String,
        source_id: String,
    },
    RollbackPupUpgrade {
        pup_id: String,
    },
    UpdatePupConfig {
        pup_id: String,
        values: HashMap<String, String>,
    },
    UpdatePupProviders {
        pup_id: String,
        providers: HashMap<String, String>,
    },
    UpdatePupHooks {
        pup_id: String,
        hooks: Vec<String>,
    },
    UpdateMetrics {
        pup_id: String,
        metrics: HashMap<String, String>,
    },
    ImportBlockchainData,
    UpdatePendingSystemNetwork {
        config: HashMap<String, String>,
    },
    EnableSsh,
    DisableSsh,
    AddSshKey {
        key: String,
    },
    RemoveSshKey {
        key: String,
    },
    AddBinaryCache {
        url: String,
    },
    RemoveBinaryCache {
        url: String,
    },
    SystemUpdate {
        pkg: String,
        version: String,
    },
}

impl Action {
    /// Short tag used in logs, matching the `kind` serde discriminant.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::InstallPup { .. } => "install_pup",
            Action::InstallPups(_) => "install_pups",
            Action::UninstallPup { .. } => "uninstall_pup",
            Action::PurgePup { .. } => "purge_pup",
            Action::EnablePup { .. } => "enable_pup",
            Action::DisablePup { .. } => "disable_pup",
            Action::UpgradePup { .. } => "upgrade_pup",
            Action::RollbackPupUpgrade { .. } => "rollback_pup_upgrade",
            Action::UpdatePupConfig { .. } => "update_pup_config",
            Action::UpdatePupProviders { .. } => "update_pup_providers",
            Action::UpdatePupHooks { .. } => "update_pup_hooks",
            Action::UpdateMetrics { .. } => "update_metrics",
            Action::ImportBlockchainData => "import_blockchain_data",
            Action::UpdatePendingSystemNetwork { .. } => "update_pending_system_network",
            Action::EnableSsh => "enable_ssh",
            Action::DisableSsh => "disable_ssh",
            Action::AddSshKey { .. } => "add_ssh_key",
            Action::RemoveSshKey { .. } => "remove_ssh_key",
            Action::AddBinaryCache { .. } => "add_binary_cache",
            Action::RemoveBinaryCache { .. } => "remove_binary_cache",
            Action::SystemUpdate { .. } => "system_update",
        }
    }

    /// The pup this action targets, if any (used to attach a pup snapshot
    /// to the job and to resolve `{pupName}` in display templates).
    pub fn pup_id(&self) -> Option<&str> {
        match self {
            Action::UninstallPup { pup_id }
            | Action::PurgePup { pup_id }
            | Action::EnablePup { pup_id }
            | Action::DisablePup { pup_id }
            | Action::UpgradePup { pup_id, .. }
            | Action::RollbackPupUpgrade { pup_id }
            | Action::UpdatePupConfig { pup_id, .. }
            | Action::UpdatePupProviders { pup_id, .. }
            | Action::UpdatePupHooks { pup_id, .. }
            | Action::UpdateMetrics { pup_id, .. } => Some(pup_id),
            _ => None,
        }
    }

    /// An action is *tracked* iff it affects user-visible state AND is
    /// long-running. `UpdateMetrics`, `UpdatePupConfig`, and
    /// `UpdatePupHooks` are untracked: no `JobRecord` is ever created for
    /// them. `InstallPups` is also untracked at the *parent* level — only
    /// its synthesized per-pup children (see the dispatcher) get records.
    pub fn is_tracked(&self) -> bool {
        !matches!(
            self,
            Action::UpdateMetrics { .. }
                | Action::UpdatePupConfig { .. }
                | Action::UpdatePupHooks { .. }
                | Action::InstallPups(_)
        )
    }

    /// Whether this action is handled in-band by the dispatcher (never
    /// touches the updater queue).
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            Action::UpdatePupConfig { .. }
                | Action::UpdatePupProviders { .. }
                | Action::UpdatePupHooks { .. }
                | Action::UpdateMetrics { .. }
        )
    }

    /// Human display name for the activity timeline, given the resolved
    /// pup name (if this action targets a pup that could be looked up).
    pub fn display_name(&self, pup_name: Option<&str>) -> String {
        let pup_or = |fallback: &str| -> String {
            match pup_name {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => fallback.to_string(),
            }
        };
        match self {
            Action::InstallPup { name, .. } => format!("Install {name}"),
            Action::InstallPups(items) => match items.as_slice() {
                [one] => format!("Install {}", one.name),
                many => format!("Install {} Pups", many.len()),
            },
            Action::UninstallPup { .. } => format!("Uninstall {}", pup_or("Pup")),
            Action::PurgePup { .. } => format!("Purge {}", pup_or("Pup")),
            Action::EnablePup { .. } => format!("Enable {}", pup_or("Pup")),
            Action::DisablePup { .. } => format!("Disable {}", pup_or("Pup")),
            Action::UpgradePup { .. } => format!("Upgrade {}", pup_or("Pup")),
            Action::RollbackPupUpgrade { .. } => format!("Rollback {}", pup_or("Pup")),
            Action::UpdatePupConfig { .. } => "Update Pup Configuration".to_string(),
            Action::UpdatePupProviders { .. } => "Update Pup Providers".to_string(),
            Action::UpdatePupHooks { .. } => "Update Pup Hooks".to_string(),
            Action::UpdateMetrics { .. } => "Update Metrics".to_string(),
            Action::ImportBlockchainData => "Import Blockchain Data".to_string(),
            Action::UpdatePendingSystemNetwork { .. } => "Update Network Configuration".to_string(),
            Action::EnableSsh => "Enable SSH".to_string(),
            Action::DisableSsh => "Disable SSH".to_string(),
            Action::AddSshKey { .. } => "Add SSH Key".to_string(),
            Action::RemoveSshKey { .. } => "Remove SSH Key".to_string(),
            Action::AddBinaryCache { .. } => "Add Binary Cache".to_string(),
            Action::RemoveBinaryCache { .. } => "Remove Binary Cache".to_string(),
            Action::SystemUpdate { .. } => "System Update".to_string(),
        }
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
