// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The outbound event shape fanned out to WebSocket subscribers.

use serde::{Deserialize, Serialize};

/// Kind of a [`Change`]. `job:*` variants are lifecycle events the bus
/// must never silently drop; `Progress`, `Pup`, and `Stats` are best
/// effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    JobCreated,
    JobUpdated,
    JobCompleted,
    JobFailed,
    JobCancelled,
    Action,
    Progress,
    Pup,
    Stats,
}

impl ChangeType {
    /// Job-lifecycle changes are never dropped under back-pressure; the
    /// bus widens the send deadline for them instead (see
    /// [`ChangeType::is_low_priority`]).
    pub fn is_job_lifecycle(&self) -> bool {
        matches!(
            self,
            ChangeType::JobCreated
                | ChangeType::JobUpdated
                | ChangeType::JobCompleted
                | ChangeType::JobFailed
                | ChangeType::JobCancelled
        )
    }

    /// `progress` and `stats` are the first things dropped when the bus
    /// is back-pressured.
    pub fn is_low_priority(&self) -> bool {
        matches!(self, ChangeType::Progress | ChangeType::Stats)
    }
}

/// A single event on the outbound change bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    /// Id of the entity this change concerns (usually a job id).
    pub id: String,
    /// Assigned by the bus at emit time: globally monotonic.
    pub seq: u64,
    /// Assigned by the bus at emit time: milliseconds since epoch.
    pub ts_ms: u64,
    pub error: bool,
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    pub update: serde_json::Value,
}

impl Change {
    /// Construct a change with `seq`/`ts_ms` left at zero; the bus fills
    /// those in at the point of sending.
    pub fn new(id: impl Into<String>, change_type: ChangeType, update: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            seq: 0,
            ts_ms: 0,
            error: false,
            change_type,
            update,
        }
    }

    pub fn with_error(mut self, error: bool) -> Self {
        self.error = error;
        self
    }
}

#[cfg(test)]
#[path = "change_tests.rs"]
mod tests;
