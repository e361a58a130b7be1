// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host-level configuration knobs consulted when writing a declarative
//! patch.

use crate::HostState;
use async_trait::async_trait;

#[async_trait]
pub trait StateManager: Clone + Send + Sync + 'static {
    async fn get(&self) -> HostState;
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeStateManager;

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    pub struct FakeStateManager {
        inner: Arc<Mutex<HostState>>,
    }

    impl FakeStateManager {
        pub fn new(state: HostState) -> Self {
            Self {
                inner: Arc::new(Mutex::new(state)),
            }
        }

        pub fn set(&self, state: HostState) {
            *self.inner.lock() = state;
        }
    }

    #[async_trait]
    impl StateManager for FakeStateManager {
        async fn get(&self) -> HostState {
            self.inner.lock().clone()
        }
    }
}
