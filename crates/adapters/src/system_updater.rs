// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single-writer system updater: consumes one queued job at a time
//! and runs its heavy work. The queue/dispatcher owns serialization
//! (one job in flight); this trait only describes running a single job.

use crate::{AdapterError, PupState};
use async_trait::async_trait;
use dbxd_core::Action;

/// Outcome of running one job through the updater.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub error: Option<String>,
    pub pup_state: Option<PupState>,
}

impl JobOutcome {
    pub fn success(pup_state: Option<PupState>) -> Self {
        Self { error: None, pup_state }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            pup_state: None,
        }
    }
}

#[async_trait]
pub trait SystemUpdater: Clone + Send + Sync + 'static {
    /// Run a single queued action to completion. The queue guarantees
    /// at most one concurrent call per updater instance.
    async fn run(&self, action: &Action, pup_state: Option<&PupState>) -> JobOutcome;
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSystemUpdater, UpdaterCall};

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Debug, Clone)]
    pub struct UpdaterCall {
        pub kind: &'static str,
    }

    struct FakeState {
        calls: Vec<UpdaterCall>,
        delay: Duration,
        fail_next: Option<String>,
    }

    /// A system updater that completes every job immediately (or after
    /// an injected delay), optionally failing the next run.
    #[derive(Clone)]
    pub struct FakeSystemUpdater {
        inner: Arc<Mutex<FakeState>>,
    }

    impl Default for FakeSystemUpdater {
        fn default() -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeState {
                    calls: Vec::new(),
                    delay: Duration::ZERO,
                    fail_next: None,
                })),
            }
        }
    }

    impl FakeSystemUpdater {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> Vec<UpdaterCall> {
            self.inner.lock().calls.clone()
        }

        pub fn set_delay(&self, delay: Duration) {
            self.inner.lock().delay = delay;
        }

        pub fn fail_next(&self, message: impl Into<String>) {
            self.inner.lock().fail_next = Some(message.into());
        }
    }

    #[async_trait]
    impl SystemUpdater for FakeSystemUpdater {
        async fn run(&self, action: &Action, pup_state: Option<&PupState>) -> JobOutcome {
            let delay = {
                let mut inner = self.inner.lock();
                inner.calls.push(UpdaterCall { kind: action.kind() });
                inner.delay
            };
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let failure = self.inner.lock().fail_next.take();
            if let Some(message) = failure {
                return JobOutcome::failure(message);
            }
            JobOutcome::success(pup_state.cloned())
        }
    }
}
