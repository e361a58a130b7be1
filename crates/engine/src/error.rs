// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the dispatcher and its supporting components.

use dbxd_adapters::AdapterError;
use dbxd_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error(transparent)]
    Storage(#[from] dbxd_storage::StorageError),

    #[error("job not found: {0}")]
    JobNotFound(String),
}
