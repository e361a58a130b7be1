// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The ephemeral execution context wrapping an [`Action`] while it moves
//! through the dispatcher. Never persisted — [`crate::JobRecord`] is the
//! durable projection of a `Job`'s lifecycle.

use crate::{Action, JobId};

/// Inputs needed to construct a [`Job`].
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub id: JobId,
    pub action: Action,
}

/// A job in flight.
///
/// The per-job structured logger is deliberately not a field here: it
/// lives in the engine crate (which depends on this one), so the engine
/// pairs a `Job` with its logger rather than this crate knowing about
/// logging at all.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub action: Action,
    /// Wall-clock epoch ms when the job was created.
    pub started_ms: u64,
    /// Set when the updater (or an inline handler) reports failure.
    pub err: Option<String>,
    /// Pup snapshot attached on success, surfaced via the `action` change.
    pub success: Option<serde_json::Value>,
    /// Pup snapshot attached by the dispatcher before enqueue (for
    /// actions that target an existing pup).
    pub pup_state: Option<serde_json::Value>,
}

impl Job {
    pub fn new(config: JobConfig, started_ms: u64) -> Self {
        Self {
            id: config.id,
            action: config.action,
            started_ms,
            err: None,
            success: None,
            pup_state: None,
        }
    }

    pub fn with_pup_state(mut self, state: serde_json::Value) -> Self {
        self.pup_state = Some(state);
        self
    }

    /// The pup id this job targets, preferring the attached snapshot's
    /// `id` field (set for adopted installs) and falling back to the
    /// action's own `pup_id()`.
    pub fn pup_id(&self) -> Option<String> {
        if let Some(state) = &self.pup_state {
            if let Some(id) = state.get("id").and_then(|v| v.as_str()) {
                return Some(id.to_string());
            }
        }
        self.action.pup_id().map(|s| s.to_string())
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
