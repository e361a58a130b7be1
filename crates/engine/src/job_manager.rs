// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Owns the [`JobRecord`] lifecycle: create, progress-update, complete,
//! query, sweep. Maintains an in-memory cache of active (non-terminal)
//! jobs; the store is the source of truth.
//!
//! A single reader-writer mutex guards the cache. Every public method
//! takes the write lock except `is_active`, which only reads it; store
//! writes happen under that same lock so a racing read can never
//! observe a cache/store split.

use std::collections::HashMap;
use std::sync::Arc;

use dbxd_core::{Action, ActionProgress, Clock, CoreError, JobId, JobRecord};
use dbxd_storage::JobStore;
use parking_lot::RwLock;

/// Owns `JobRecord` persistence and the `activeJobs` cache.
pub struct JobManager<C: Clock> {
    store: Arc<JobStore>,
    clock: C,
    active: RwLock<HashMap<JobId, JobRecord>>,
}

impl<C: Clock> JobManager<C> {
    pub fn new(store: Arc<JobStore>, clock: C) -> Self {
        Self {
            store,
            clock,
            active: RwLock::new(HashMap::new()),
        }
    }

    /// Compute a record's display name from its originating action and
    /// an already-resolved pup *name* (not id — `Action::display_name`
    /// wants the human name, while `pup_id` is the record's stable
    /// foreign key), and create it. Caller (the dispatcher) is
    /// responsible for resolving `pup_name` and for emitting
    /// `job:created`.
    pub fn create(
        &self,
        id: JobId,
        action: &Action,
        pup_id: Option<String>,
        pup_name: Option<&str>,
    ) -> Result<JobRecord, CoreError> {
        let display_name = action.display_name(pup_name);
        let record = JobRecord::new(id.clone(), display_name, pup_id, self.clock.epoch_ms());
        self.store.put(&record)?;
        self.active.write().insert(id, record.clone());
        Ok(record)
    }

    /// Apply a progress report. Errors in the store layer here are
    /// reported by the caller via log only; the job continues.
    pub fn update_progress(&self, ap: &ActionProgress) -> Result<JobRecord, CoreError> {
        let mut active = self.active.write();
        let record = active
            .get_mut(&ap.action_id)
            .ok_or_else(|| CoreError::NotFound(ap.action_id.to_string()))?;
        record.apply_progress(ap);
        let snapshot = record.clone();
        self.store.put(&snapshot)?;
        Ok(snapshot)
    }

    /// Finalize a job. Idempotent: a second call for a non-active id is
    /// a no-op returning `Ok(None)`.
    pub fn complete(&self, id: &JobId, err: Option<&str>) -> Result<Option<JobRecord>, CoreError> {
        let mut active = self.active.write();
        let Some(mut record) = active.remove(id) else {
            return Ok(None);
        };
        record.complete(err, self.clock.epoch_ms());
        self.store.put(&record)?;
        Ok(Some(record))
    }

    /// Cancel an active job. Errors (mirroring `JobRecord::cancel`) if
    /// the job isn't active.
    pub fn cancel(&self, id: &JobId) -> Result<JobRecord, CoreError> {
        let mut active = self.active.write();
        let record = active.get_mut(id).ok_or_else(|| CoreError::NotFound(id.to_string()))?;
        record.cancel(self.clock.epoch_ms())?;
        let snapshot = record.clone();
        active.remove(id);
        self.store.put(&snapshot)?;
        Ok(snapshot)
    }

    pub fn is_active(&self, id: &JobId) -> bool {
        self.active.read().contains_key(id)
    }

    pub fn get(&self, id: &JobId) -> Result<Option<JobRecord>, CoreError> {
        if let Some(record) = self.active.read().get(id) {
            return Ok(Some(record.clone()));
        }
        Ok(self.store.get(id)?)
    }

    pub fn get_all(&self) -> Result<Vec<JobRecord>, CoreError> {
        Ok(self.store.get_all()?)
    }

    pub fn get_active(&self) -> Result<Vec<JobRecord>, CoreError> {
        Ok(self.store.get_active()?)
    }

    pub fn get_recent(&self, limit: usize) -> Result<Vec<JobRecord>, CoreError> {
        Ok(self.store.get_recent(limit)?)
    }

    pub fn clear_completed(&self, max_age_ms: u64) -> Result<usize, CoreError> {
        Ok(self.store.clear_completed(self.clock.epoch_ms(), max_age_ms)?)
    }

    pub fn clear_all(&self) -> Result<(), CoreError> {
        self.store.clear_all()?;
        self.active.write().clear();
        Ok(())
    }

    /// Fail any record stuck `queued`/`in_progress` past `max_age_ms`,
    /// dropping matching cache entries. Run on startup and periodically.
    pub fn clear_orphaned(&self, max_age_ms: u64) -> Result<Vec<JobId>, CoreError> {
        let touched = self.store.clear_orphaned(self.clock.epoch_ms(), max_age_ms)?;
        let mut active = self.active.write();
        for id in &touched {
            active.remove(id);
        }
        Ok(touched)
    }

    /// Rebuild the `activeJobs` cache from the store on startup.
    pub fn sync_with_active_jobs(&self) -> Result<(), CoreError> {
        let active_records = self.store.get_active()?;
        let mut active = self.active.write();
        active.clear();
        for record in active_records {
            active.insert(record.id.clone(), record);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "job_manager_tests.rs"]
mod tests;
