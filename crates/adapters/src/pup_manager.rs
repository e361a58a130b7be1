// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The pup manager: owns every installed pup's state and is the only
//! collaborator allowed to mutate it. Consumed, never implemented, by
//! the dispatcher — this module defines the contract only.

use crate::{AdapterError, HealthReport, PupManifest, PupMutation, PupState, PupStats, Source};
use async_trait::async_trait;
use std::collections::HashMap;

/// Adapter for the pup manager.
#[async_trait]
pub trait PupManager: Clone + Send + Sync + 'static {
    /// Current state and stats for a pup.
    async fn get(&self, id: &str) -> Result<(PupState, PupStats), AdapterError>;

    /// Adopt a freshly resolved manifest as a new pup, returning its id.
    async fn adopt(
        &self,
        manifest: &PupManifest,
        source: &Source,
        options: &HashMap<String, String>,
    ) -> Result<String, AdapterError>;

    /// Apply a mutation, returning the pup's new state.
    async fn update_pup(&self, id: &str, mutation: PupMutation) -> Result<PupState, AdapterError>;

    /// Derive a health report from a state snapshot. Pure/local — no I/O.
    fn health_of(&self, state: &PupState) -> HealthReport;

    /// Whether a pup has everything it needs to be started (config
    /// supplied, dependencies satisfied).
    async fn can_start(&self, id: &str) -> Result<bool, AdapterError>;

    /// Hint the manager to poll this pup's backing container sooner
    /// than its normal cadence, after an action that likely changed it.
    async fn fast_poll(&self, id: &str);

    /// Record externally-reported metrics for a pup. Never tracked as a
    /// job; fire-and-forget from the dispatcher's perspective.
    async fn update_metrics(&self, id: &str, metrics: HashMap<String, String>) -> Result<(), AdapterError>;
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakePupManager, PupManagerCall};

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// A recorded call to [`FakePupManager`], for assertions in tests.
    #[derive(Debug, Clone, PartialEq)]
    pub enum PupManagerCall {
        Get(String),
        Adopt { name: String, source_id: String },
        UpdatePup { id: String, mutation: PupMutation },
        CanStart(String),
        FastPoll(String),
        UpdateMetrics(String),
    }

    struct FakeState {
        pups: HashMap<String, (PupState, PupStats)>,
        calls: Vec<PupManagerCall>,
        next_id: u64,
        adopt_should_fail: bool,
        can_start: HashMap<String, bool>,
        can_start_should_fail: bool,
    }

    /// In-memory pup manager for tests: every pup lives in a map, every
    /// call is recorded for assertions.
    #[derive(Clone)]
    pub struct FakePupManager {
        inner: Arc<Mutex<FakeState>>,
    }

    impl Default for FakePupManager {
        fn default() -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeState {
                    pups: HashMap::new(),
                    calls: Vec::new(),
                    next_id: 0,
                    adopt_should_fail: false,
                    can_start: HashMap::new(),
                    can_start_should_fail: false,
                })),
            }
        }
    }

    impl FakePupManager {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> Vec<PupManagerCall> {
            self.inner.lock().calls.clone()
        }

        pub fn seed(&self, state: PupState) {
            let stats = PupStats {
                pup_id: state.id.clone(),
                cpu_percent: 0.0,
                mem_bytes: 0,
            };
            self.inner.lock().pups.insert(state.id.clone(), (state, stats));
        }

        pub fn set_adopt_should_fail(&self, fail: bool) {
            self.inner.lock().adopt_should_fail = fail;
        }

        pub fn set_can_start(&self, id: &str, can_start: bool) {
            self.inner.lock().can_start.insert(id.to_string(), can_start);
        }

        pub fn set_can_start_should_fail(&self, fail: bool) {
            self.inner.lock().can_start_should_fail = fail;
        }
    }

    #[async_trait]
    impl PupManager for FakePupManager {
        async fn get(&self, id: &str) -> Result<(PupState, PupStats), AdapterError> {
            let mut inner = self.inner.lock();
            inner.calls.push(PupManagerCall::Get(id.to_string()));
            inner
                .pups
                .get(id)
                .cloned()
                .ok_or_else(|| AdapterError::NotFound(id.to_string()))
        }

        async fn adopt(
            &self,
            manifest: &PupManifest,
            source: &Source,
            _options: &HashMap<String, String>,
        ) -> Result<String, AdapterError> {
            let mut inner = self.inner.lock();
            inner.calls.push(PupManagerCall::Adopt {
                name: manifest.name.clone(),
                source_id: source.id.clone(),
            });
            if inner.adopt_should_fail {
                return Err(AdapterError::AdoptFailed(format!("rejected {}", manifest.name)));
            }
            inner.next_id += 1;
            let id = format!("pup-{}", inner.next_id);
            let state = PupState::new(id.clone(), manifest.name.clone(), manifest.version.clone(), source.id.clone());
            let stats = PupStats {
                pup_id: id.clone(),
                cpu_percent: 0.0,
                mem_bytes: 0,
            };
            inner.pups.insert(id.clone(), (state, stats));
            Ok(id)
        }

        async fn update_pup(&self, id: &str, mutation: PupMutation) -> Result<PupState, AdapterError> {
            let mut inner = self.inner.lock();
            inner.calls.push(PupManagerCall::UpdatePup {
                id: id.to_string(),
                mutation: mutation.clone(),
            });
            let (state, _) = inner.pups.get_mut(id).ok_or_else(|| AdapterError::NotFound(id.to_string()))?;
            match mutation {
                PupMutation::SetConfig(values) => {
                    state.config.extend(values);
                    state.config_saved = true;
                    state.needs_conf = false;
                }
                PupMutation::SetProviders(values) => {
                    state.providers.extend(values);
                }
                PupMutation::SetHooks(hooks) => {
                    state.hooks = hooks;
                }
                PupMutation::SetEnabled(enabled) => {
                    state.enabled = enabled;
                }
            }
            Ok(state.clone())
        }

        fn health_of(&self, state: &PupState) -> HealthReport {
            HealthReport {
                needs_conf: state.needs_conf,
                needs_deps: state.needs_deps,
            }
        }

        async fn can_start(&self, id: &str) -> Result<bool, AdapterError> {
            let mut inner = self.inner.lock();
            inner.calls.push(PupManagerCall::CanStart(id.to_string()));
            if inner.can_start_should_fail {
                return Err(AdapterError::NotFound(id.to_string()));
            }
            Ok(*inner.can_start.get(id).unwrap_or(&true))
        }

        async fn fast_poll(&self, id: &str) {
            self.inner.lock().calls.push(PupManagerCall::FastPoll(id.to_string()));
        }

        async fn update_metrics(&self, id: &str, _metrics: HashMap<String, String>) -> Result<(), AdapterError> {
            self.inner.lock().calls.push(PupManagerCall::UpdateMetrics(id.to_string()));
            Ok(())
        }
    }
}
