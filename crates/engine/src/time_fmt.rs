// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timestamp formatting for the per-job log file, which is plain text
//! rather than structured JSON: `[YYYY-MM-DD HH:MM:SS] {msg}`.

use chrono::{DateTime, Utc};

/// Format epoch milliseconds as `YYYY-MM-DD HH:MM:SS` UTC.
pub fn format_ms_utc(epoch_ms: u64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(epoch_ms as i64) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

/// Format the current wall-clock time in the same shape as
/// [`format_ms_utc`].
pub fn format_utc_now() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
