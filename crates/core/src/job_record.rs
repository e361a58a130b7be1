// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The persisted, user-visible snapshot of a job's lifecycle.

use crate::{ActionProgress, CoreError, JobId};
use serde::{Deserialize, Serialize};

/// Status of a [`JobRecord`]. `Completed`, `Failed`, and `Cancelled` are
/// terminal and absorbing: once reached, nothing (save an
/// acknowledge/read flag, out of scope here) may change the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    InProgress,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Queued => "queued",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// Persisted snapshot for the activity view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    pub started_ms: u64,
    pub finished_ms: Option<u64>,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pup_id: Option<String>,
    pub status: JobStatus,
    /// 0-100.
    pub progress: u8,
    pub summary_message: String,
    #[serde(default)]
    pub error_message: String,
}

impl JobRecord {
    /// A freshly created record: `status = queued, progress = 0,
    /// finished = nil, summary_message = "Job queued"`.
    pub fn new(
        id: JobId,
        display_name: impl Into<String>,
        pup_id: Option<String>,
        started_ms: u64,
    ) -> Self {
        Self {
            id,
            started_ms,
            finished_ms: None,
            display_name: display_name.into(),
            pup_id,
            status: JobStatus::Queued,
            progress: 0,
            summary_message: "Job queued".to_string(),
            error_message: String::new(),
        }
    }

    /// Apply a progress report. No-op (not an error) once the record is
    /// terminal — late progress from a racing updater must never
    /// resurrect a finished job.
    ///
    /// `progress = max(prev, ap.progress)` when `ap.progress > 0`, else
    /// left unchanged. The first progress update (of any kind) flips
    /// `queued -> in_progress`.
    pub fn apply_progress(&mut self, ap: &ActionProgress) {
        if self.status.is_terminal() {
            return;
        }
        if self.status == JobStatus::Queued {
            self.status = JobStatus::InProgress;
        }
        if ap.progress > 0 && ap.progress > self.progress {
            self.progress = ap.progress;
        }
        self.summary_message = ap.msg.clone();
        if ap.error {
            self.error_message = ap.msg.clone();
        }
    }

    /// Finalize the job. Idempotent: calling this again on an
    /// already-terminal record is a silent no-op, matching the updater
    /// completion path which cannot tell whether a racing `Cancel`
    /// already finalized the record.
    pub fn complete(&mut self, err: Option<&str>, finished_ms: u64) {
        if self.status.is_terminal() {
            return;
        }
        self.finished_ms = Some(finished_ms);
        match err {
            None => {
                self.status = JobStatus::Completed;
                self.progress = 100;
                self.summary_message = "Job completed successfully".to_string();
                self.error_message.clear();
            }
            Some(e) => {
                self.status = JobStatus::Failed;
                self.error_message = e.to_string();
                self.summary_message = "Job failed".to_string();
            }
        }
    }

    /// Cancel the job. Only legal while `status ∈ {queued, in_progress}`;
    /// cancelling an already-terminal job is an error, not a no-op,
    /// since the caller needs to know whether the `job:cancelled` change
    /// was actually emitted.
    pub fn cancel(&mut self, finished_ms: u64) -> Result<(), CoreError> {
        if self.status.is_terminal() {
            return Err(CoreError::InvalidTransition);
        }
        self.status = JobStatus::Cancelled;
        self.finished_ms = Some(finished_ms);
        self.summary_message = "Job cancelled by user".to_string();
        Ok(())
    }

    /// Mark a stuck `queued`/`in_progress` record as failed because no
    /// live job claims it (the dispatcher restarted, or its task panicked
    /// before reaching [`JobRecord::complete`]). A no-op on a record
    /// already terminal.
    pub fn mark_orphaned(&mut self, finished_ms: u64) {
        if self.status.is_terminal() {
            return;
        }
        self.status = JobStatus::Failed;
        self.finished_ms = Some(finished_ms);
        self.summary_message = "Job failed".to_string();
        self.error_message = "Job was orphaned (stuck in queue)".to_string();
    }
}

#[cfg(test)]
#[path = "job_record_tests.rs"]
mod tests;
