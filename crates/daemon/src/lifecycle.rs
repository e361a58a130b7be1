// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: configuration, startup, shutdown.

use std::fs::File;
use std::path::PathBuf;

use fs2::FileExt;
use thiserror::Error;
use tracing::info;

use crate::env::state_dir;

/// Paths and directories the daemon reads and writes.
///
/// One daemon serves a single host; there is no per-project split.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. `~/.local/state/dbxd`).
    pub state_dir: PathBuf,
    /// Path to the lock/PID file.
    pub lock_path: PathBuf,
    /// Path to the version marker file.
    pub version_path: PathBuf,
    /// Path to the daemon's own log file.
    pub log_path: PathBuf,
    /// Path to the job-record SQL database.
    pub db_path: PathBuf,
    /// Directory per-job tailable log files (`pup-{jobId}`) are written under.
    pub container_log_dir: PathBuf,
}

impl Config {
    /// Load configuration for the single host-level daemon.
    ///
    /// Uses fixed paths under `~/.local/state/dbxd/` (or `$XDG_STATE_HOME/dbxd/`).
    pub fn load() -> Result<Self, LifecycleError> {
        let state_dir = state_dir()?;

        Ok(Self {
            lock_path: state_dir.join("daemon.pid"),
            version_path: state_dir.join("daemon.version"),
            log_path: state_dir.join("daemon.log"),
            db_path: state_dir.join("jobs.db"),
            container_log_dir: state_dir.join("logs"),
            state_dir,
        })
    }
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("could not determine state directory")]
    NoStateDir,

    #[error("failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("job store error: {0}")]
    Storage(#[from] dbxd_storage::StorageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A held exclusive lock on [`Config::lock_path`]. Dropping it releases
/// the advisory flock; the PID written inside stays on disk as a
/// breadcrumb for the next `--version`/already-running check.
pub struct LockGuard {
    _file: File,
}

/// Acquire the daemon's single-instance lock, writing our PID into it.
///
/// Uses `OpenOptions` without truncation so a failed lock attempt never
/// wipes the PID of the daemon that is actually running.
pub fn acquire_lock(config: &Config) -> Result<LockGuard, LifecycleError> {
    if let Some(parent) = config.lock_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new().write(true).create(true).truncate(false).open(&config.lock_path)?;
    file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;

    use std::io::Write;
    let mut file = file;
    file.set_len(0)?;
    writeln!(file, "{}", std::process::id())?;

    std::fs::write(&config.version_path, env!("CARGO_PKG_VERSION"))?;

    Ok(LockGuard { _file: file })
}

/// Ensure the directories the daemon writes into exist.
pub fn prepare_directories(config: &Config) -> Result<(), LifecycleError> {
    std::fs::create_dir_all(&config.state_dir)?;
    std::fs::create_dir_all(&config.container_log_dir)?;
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Open (creating if absent) the durable job store at [`Config::db_path`].
pub fn open_job_store(config: &Config) -> Result<dbxd_storage::JobStore, LifecycleError> {
    info!(path = %config.db_path.display(), "opening job store");
    Ok(dbxd_storage::JobStore::open(&config.db_path)?)
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
