// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors surfaced by the external collaborators the dispatcher calls
/// out to: the pup manager, source manager, declarative-config writer,
/// and system updater.
#[derive(Debug, Error, Clone)]
pub enum AdapterError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("resolve failed: {0}")]
    ResolveFailed(String),

    #[error("adopt failed: {0}")]
    AdoptFailed(String),

    #[error("apply failed: {0}")]
    ApplyFailed(String),

    #[error("timed out")]
    Timeout,
}

impl From<AdapterError> for dbxd_core::CoreError {
    fn from(err: AdapterError) -> Self {
        match err {
            AdapterError::NotFound(m) => dbxd_core::CoreError::NotFound(m),
            AdapterError::ResolveFailed(m) => dbxd_core::CoreError::ResolveFailed(m),
            AdapterError::AdoptFailed(m) => dbxd_core::CoreError::AdoptFailed(m),
            AdapterError::ApplyFailed(m) => dbxd_core::CoreError::ApplyFailed(m),
            AdapterError::Timeout => dbxd_core::CoreError::Timeout,
        }
    }
}
