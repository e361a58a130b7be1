// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed persistence for [`JobRecord`].
//!
//! Rows are stored one-per-job as `(id, value)`, `value` being the
//! record serialized to JSON. Status- and time-scoped queries reach
//! into that JSON with `json_extract` rather than promoting every
//! queryable field to its own column, since the record shape still
//! moves with the job-lifecycle model upstream.

use dbxd_core::{JobId, JobRecord};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::StorageError;
use tracing::debug;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS jobs (
    id    TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS jobs_status_idx ON jobs (json_extract(value, '$.status'));
CREATE INDEX IF NOT EXISTS jobs_finished_idx ON jobs (json_extract(value, '$.finished_ms'));
";

/// Terminal statuses as the literal strings they serialize to. Kept in
/// one place since every query below filters on them.
const TERMINAL_STATUSES: [&str; 3] = ["completed", "failed", "cancelled"];

fn in_clause(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| format!("'{v}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Durable handle onto the job-record table.
pub struct JobStore {
    conn: Mutex<Connection>,
}

impl JobStore {
    /// Open (creating if absent) the database file at `path` and run
    /// migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// An in-memory store, for tests and for a first-boot daemon that
    /// hasn't been given a persistence directory yet.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| StorageError::Migration(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Insert or overwrite a record by id.
    pub fn put(&self, record: &JobRecord) -> Result<(), StorageError> {
        let value = serde_json::to_string(record)?;
        self.conn.lock().execute(
            "INSERT INTO jobs (id, value) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET value = excluded.value",
            params![record.id.as_str(), value],
        )?;
        Ok(())
    }

    /// Look up a single record by id.
    pub fn get(&self, id: &JobId) -> Result<Option<JobRecord>, StorageError> {
        let conn = self.conn.lock();
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM jobs WHERE id = ?1",
                params![id.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.map(|v| serde_json::from_str(&v)).transpose()?)
    }

    fn query_records(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<JobRecord>, StorageError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, |row| row.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(serde_json::from_str(&row?)?);
        }
        Ok(out)
    }

    /// Every record, newest-started first.
    pub fn get_all(&self) -> Result<Vec<JobRecord>, StorageError> {
        self.query_records(
            "SELECT value FROM jobs ORDER BY json_extract(value, '$.started_ms') DESC",
            &[],
        )
    }

    /// Records in `queued` or `in_progress`, oldest-started first — the
    /// order the dispatcher wants to report/reconcile them in.
    pub fn get_active(&self) -> Result<Vec<JobRecord>, StorageError> {
        self.query_records(
            "SELECT value FROM jobs
             WHERE json_extract(value, '$.status') IN ('queued', 'in_progress')
             ORDER BY json_extract(value, '$.started_ms') ASC",
            &[],
        )
    }

    /// The most recent `limit` terminal records, newest-finished first.
    pub fn get_recent(&self, limit: usize) -> Result<Vec<JobRecord>, StorageError> {
        let sql = format!(
            "SELECT value FROM jobs
             WHERE json_extract(value, '$.status') IN ({})
             ORDER BY json_extract(value, '$.finished_ms') DESC
             LIMIT ?1",
            in_clause(&TERMINAL_STATUSES)
        );
        self.query_records(&sql, &[&(limit as i64)])
    }

    /// Delete every terminal record whose `finished_ms` is older than
    /// `now_ms - max_age_ms`. Returns the number of rows removed.
    pub fn clear_completed(&self, now_ms: u64, max_age_ms: u64) -> Result<usize, StorageError> {
        let cutoff = now_ms.saturating_sub(max_age_ms);
        let sql = format!(
            "DELETE FROM jobs
             WHERE json_extract(value, '$.status') IN ({})
               AND json_extract(value, '$.finished_ms') < ?1",
            in_clause(&TERMINAL_STATUSES)
        );
        let n = self.conn.lock().execute(&sql, params![cutoff as i64])?;
        debug!(removed = n, cutoff, "cleared completed job records");
        Ok(n)
    }

    /// Wipe every record, active or terminal.
    pub fn clear_all(&self) -> Result<(), StorageError> {
        self.conn.lock().execute("DELETE FROM jobs", [])?;
        Ok(())
    }

    /// Find non-terminal records older than `max_age_ms`, mark each
    /// failed via [`JobRecord::mark_orphaned`], persist the mutation,
    /// and return the ids touched. Used at startup to reconcile jobs
    /// that were left `queued`/`in_progress` by a prior process that
    /// never reached [`JobRecord::complete`].
    pub fn clear_orphaned(&self, now_ms: u64, max_age_ms: u64) -> Result<Vec<JobId>, StorageError> {
        let cutoff = now_ms.saturating_sub(max_age_ms);
        let stale = self.query_records(
            "SELECT value FROM jobs
             WHERE json_extract(value, '$.status') IN ('queued', 'in_progress')
               AND json_extract(value, '$.started_ms') < ?1",
            &[&(cutoff as i64)],
        )?;

        let mut touched = Vec::with_capacity(stale.len());
        for mut record in stale {
            record.mark_orphaned(now_ms);
            self.put(&record)?;
            touched.push(record.id);
        }
        if !touched.is_empty() {
            debug!(count = touched.len(), "marked orphaned job records as failed");
        }
        Ok(touched)
    }

    /// True iff `status` is non-terminal for the given job, matching
    /// how the job manager answers `IsActive` without a round trip
    /// through the in-memory cache.
    pub fn is_active(&self, id: &JobId) -> Result<bool, StorageError> {
        Ok(self
            .get(id)?
            .map(|r| !r.status.is_terminal())
            .unwrap_or(false))
    }
}

#[cfg(test)]
#[path = "job_store_tests.rs"]
mod tests;
