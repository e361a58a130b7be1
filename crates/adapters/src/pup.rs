// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The pup snapshot shape the dispatcher attaches to jobs and forwards
//! as `pup` changes. Owned by [`crate::PupManager`]; this crate only
//! needs its shape, never its storage.

use dbxd_core::ManifestConfigField;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A pup's current state, as the pup manager reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PupState {
    pub id: String,
    pub name: String,
    pub version: String,
    pub source_id: String,
    pub enabled: bool,
    #[serde(default)]
    pub config: HashMap<String, String>,
    #[serde(default)]
    pub providers: HashMap<String, String>,
    #[serde(default)]
    pub hooks: Vec<String>,
    pub config_saved: bool,
    pub needs_conf: bool,
    pub needs_deps: bool,
}

impl PupState {
    pub fn new(id: impl Into<String>, name: impl Into<String>, version: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: version.into(),
            source_id: source_id.into(),
            enabled: false,
            config: HashMap::new(),
            providers: HashMap::new(),
            hooks: Vec::new(),
            config_saved: false,
            needs_conf: false,
            needs_deps: false,
        }
    }
}

/// Live stats for a pup, pushed to the dispatcher on a side channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PupStats {
    pub pup_id: String,
    pub cpu_percent: f64,
    pub mem_bytes: u64,
}

/// A pup-state change pushed onto the dispatcher's `pup` update channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pupdate {
    pub state: PupState,
}

/// Health report produced by [`crate::PupManager::health_of`], consulted
/// by the `UpdatePupConfig` inline handler to decide whether to
/// auto-enable a pup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HealthReport {
    pub needs_conf: bool,
    pub needs_deps: bool,
}

/// A mutation applied to a pup via [`crate::PupManager::update_pup`].
/// Closed set mirroring the updater's own mutator functions, so the
/// dispatch table in the engine crate stays exhaustive-checkable.
#[derive(Debug, Clone, PartialEq)]
pub enum PupMutation {
    SetConfig(HashMap<String, String>),
    SetProviders(HashMap<String, String>),
    SetHooks(Vec<String>),
    SetEnabled(bool),
}

/// A resolved pup manifest, as returned by [`crate::SourceManager`].
#[derive(Debug, Clone, PartialEq)]
pub struct PupManifest {
    pub name: String,
    pub version: String,
    pub config_fields: Vec<ManifestConfigField>,
}

/// The source a manifest was resolved from.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub id: String,
}

/// Host-level knobs consulted when writing a declarative-configuration
/// patch (network layout, binary caches, SSH keys, …).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostState {
    pub ssh_enabled: bool,
    pub binary_caches: Vec<String>,
}
