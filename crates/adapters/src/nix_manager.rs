// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The declarative system-configuration writer. A `Patch` accumulates
//! one or more file rewrites; `apply()` is the single point where those
//! writes take effect (via an external "apply patch" capability this
//! crate treats as opaque).

use crate::{AdapterError, HostState, PupState};
use async_trait::async_trait;

/// An in-progress declarative-configuration patch. Implementations are
/// free to buffer writes however they like; `apply()` is the only
/// operation the dispatcher waits on.
pub trait Patch: Send {
    /// Stage this pup's declarative file for rewrite.
    fn write_pup_file(&mut self, state: &PupState, host: &HostState);

    /// Stage a rewrite of the shared container block (network, binary
    /// caches, …) that every pup's file is generated against.
    fn update_system_container_configuration(&mut self);
}

#[async_trait]
pub trait NixManager: Clone + Send + Sync + 'static {
    type Patch: Patch;

    /// Start a new patch.
    fn new_patch(&self) -> Self::Patch;

    /// Apply a patch, bounded by an implementer-chosen timeout
    /// (recommended 60s) so a wedged apply cannot stall the dispatcher.
    async fn apply(&self, patch: Self::Patch) -> Result<(), AdapterError>;
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeNixManager, FakePatch, NixCall};

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    pub enum NixCall {
        Apply(FakePatch),
    }

    /// An in-memory patch: just the sequence of staged writes.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct FakePatch {
        pub writes: Vec<String>,
    }

    impl Patch for FakePatch {
        fn write_pup_file(&mut self, state: &PupState, _host: &HostState) {
            self.writes.push(format!("pup:{}", state.id));
        }

        fn update_system_container_configuration(&mut self) {
            self.writes.push("system-container".to_string());
        }
    }

    struct FakeState {
        calls: Vec<NixCall>,
        apply_should_fail: bool,
    }

    #[derive(Clone)]
    pub struct FakeNixManager {
        inner: Arc<Mutex<FakeState>>,
    }

    impl Default for FakeNixManager {
        fn default() -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeState {
                    calls: Vec::new(),
                    apply_should_fail: false,
                })),
            }
        }
    }

    impl FakeNixManager {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> Vec<NixCall> {
            self.inner.lock().calls.clone()
        }

        pub fn set_apply_should_fail(&self, fail: bool) {
            self.inner.lock().apply_should_fail = fail;
        }
    }

    #[async_trait]
    impl NixManager for FakeNixManager {
        type Patch = FakePatch;

        fn new_patch(&self) -> FakePatch {
            FakePatch::default()
        }

        async fn apply(&self, patch: FakePatch) -> Result<(), AdapterError> {
            let mut inner = self.inner.lock();
            inner.calls.push(NixCall::Apply(patch));
            if inner.apply_should_fail {
                return Err(AdapterError::ApplyFailed("fake apply rejected".to_string()));
            }
            Ok(())
        }
    }
}
