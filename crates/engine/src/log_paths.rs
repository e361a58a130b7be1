// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path builder for per-job log files.
//!
//! Structure: `{container_log_dir}/pup-{job_id}`, matching the
//! persisted-state-layout contract: per-job log files at
//! `{ContainerLogDir}/pup-{jobId}`.

use std::path::{Path, PathBuf};

pub fn job_log_path(container_log_dir: &Path, job_id: &str) -> PathBuf {
    container_log_dir.join(format!("pup-{job_id}"))
}

#[cfg(test)]
#[path = "log_paths_tests.rs"]
mod tests;
