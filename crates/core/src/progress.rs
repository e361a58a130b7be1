// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single progress-event shape every producer uses to report work:
//! the step logger, the queue pump, and inline handlers alike.

use crate::JobId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single progress report against a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionProgress {
    pub action_id: JobId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pup_id: Option<String>,
    /// 0-100.
    pub progress: u8,
    pub step: String,
    pub msg: String,
    #[serde(default)]
    pub error: bool,
    #[serde(with = "duration_ms")]
    pub step_taken: Duration,
}

impl ActionProgress {
    pub fn new(action_id: JobId, step: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            action_id,
            pup_id: None,
            progress: 0,
            step: step.into(),
            msg: msg.into(),
            error: false,
            step_taken: Duration::ZERO,
        }
    }

    pub fn with_pup_id(mut self, pup_id: impl Into<String>) -> Self {
        self.pup_id = Some(pup_id.into());
        self
    }

    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = progress.min(100);
        self
    }

    pub fn with_error(mut self, error: bool) -> Self {
        self.error = error;
        self
    }

    pub fn with_step_taken(mut self, step_taken: Duration) -> Self {
        self.step_taken = step_taken;
        self
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, s: S) -> Result<S::Ok, S::Error> {
        duration.as_millis().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(d)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
