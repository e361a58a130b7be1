// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Streams log lines for a job id or pup id. Well-known synthetic ids
//! `dbx` and `dkm` map to host journal units; everything else is a pup
//! container log.

use crate::AdapterError;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Handle returned by [`LogTailer::get_channel`]; dropping it (or
/// calling [`TailHandle::cancel`]) stops the tail.
pub struct TailHandle {
    pub lines: mpsc::Receiver<String>,
    cancel_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TailHandle {
    pub fn new(lines: mpsc::Receiver<String>, cancel_tx: tokio::sync::oneshot::Sender<()>) -> Self {
        Self {
            lines,
            cancel_tx: Some(cancel_tx),
        }
    }

    pub fn cancel(mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            let _ = tx.send(());
        }
    }
}

#[async_trait]
pub trait LogTailer: Clone + Send + Sync + 'static {
    async fn get_channel(&self, id: &str) -> Result<TailHandle, AdapterError>;
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeLogTailer;

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    pub struct FakeLogTailer {
        inner: Arc<Mutex<HashMap<String, Vec<String>>>>,
    }

    impl FakeLogTailer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn seed(&self, id: &str, lines: Vec<String>) {
            self.inner.lock().insert(id.to_string(), lines);
        }
    }

    #[async_trait]
    impl LogTailer for FakeLogTailer {
        async fn get_channel(&self, id: &str) -> Result<TailHandle, AdapterError> {
            let lines = self
                .inner
                .lock()
                .get(id)
                .cloned()
                .ok_or_else(|| AdapterError::NotFound(id.to_string()))?;
            let (tx, rx) = mpsc::channel(lines.len().max(1));
            for line in lines {
                let _ = tx.send(line).await;
            }
            let (cancel_tx, _cancel_rx) = tokio::sync::oneshot::channel();
            Ok(TailHandle::new(rx, cancel_tx))
        }
    }
}
