// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job structured logger. One [`ActionLogger`] per job, identified
//! by `job_id` and an optional `pup_id`; it is owned by the job that
//! created it and discarded with it.
//!
//! A logger never calls into the job manager directly — every emitted
//! [`ActionProgress`] goes out over an unbounded channel the dispatcher
//! drains on its own loop iteration. This is what keeps the job
//! manager's lock reentrancy-safe: a step logger call can happen from
//! any task without the caller ever holding the job-manager lock.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dbxd_core::{ActionProgress, JobId};
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::log_paths::job_log_path;
use crate::time_fmt::format_utc_now;

struct StepState {
    progress: u8,
    started: Instant,
}

/// Per-job logger. `Step(name)` memoizes a [`StepLogger`] by name so
/// repeated calls accumulate elapsed time from the step's first use.
pub struct ActionLogger {
    job_id: JobId,
    pup_id: Option<String>,
    log_dir: PathBuf,
    tx: mpsc::UnboundedSender<ActionProgress>,
    steps: Mutex<HashMap<String, StepState>>,
}

impl ActionLogger {
    pub fn new(
        job_id: JobId,
        pup_id: Option<String>,
        log_dir: PathBuf,
        tx: mpsc::UnboundedSender<ActionProgress>,
    ) -> Arc<Self> {
        Arc::new(Self {
            job_id,
            pup_id,
            log_dir,
            tx,
            steps: Mutex::new(HashMap::new()),
        })
    }

    /// Get (or create) the named step's logger.
    pub fn step(self: &Arc<Self>, name: impl Into<String>) -> StepLogger {
        let name = name.into();
        self.steps
            .lock()
            .entry(name.clone())
            .or_insert_with(|| StepState {
                progress: 0,
                started: Instant::now(),
            });
        StepLogger {
            logger: Arc::clone(self),
            name,
        }
    }

    fn step_snapshot(&self, name: &str) -> (u8, Duration) {
        let steps = self.steps.lock();
        match steps.get(name) {
            Some(s) => (s.progress, s.started.elapsed()),
            None => (0, Duration::ZERO),
        }
    }

    fn set_step_progress(&self, name: &str, progress: u8) {
        if let Some(s) = self.steps.lock().get_mut(name) {
            s.progress = progress.min(100);
        }
    }

    fn emit(&self, step: &str, msg: &str, error: bool) {
        let (progress, step_taken) = self.step_snapshot(step);
        let glyph = if error { "\u{2049}\u{fe0f}" } else { "\u{2714}\u{fe0f}" };
        println!(
            "{glyph} {}:{step} [{:.1}s] {progress}% {msg}",
            self.job_id,
            step_taken.as_secs_f64()
        );

        let path = job_log_path(&self.log_dir, self.job_id.as_str());
        if let Err(e) = append_line(&path, msg) {
            tracing::warn!(job_id = %self.job_id, error = %e, "failed to write job log");
        }

        let ap = ActionProgress {
            action_id: self.job_id.clone(),
            pup_id: self.pup_id.clone(),
            progress,
            step: step.to_string(),
            msg: msg.to_string(),
            error,
            step_taken,
        };
        // An unbounded send only fails once the dispatcher has dropped
        // its receiver (shutdown); there is nothing useful to do with a
        // progress event at that point.
        let _ = self.tx.send(ap);
    }
}

fn append_line(path: &std::path::Path, msg: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "[{}] {}", format_utc_now(), msg)
}

/// A named sub-stream of a job's log, time-anchored at first use.
pub struct StepLogger {
    logger: Arc<ActionLogger>,
    name: String,
}

impl StepLogger {
    pub fn log(&self, msg: impl AsRef<str>) {
        self.logger.emit(&self.name, msg.as_ref(), false);
    }

    pub fn err(&self, msg: impl AsRef<str>) {
        self.logger.emit(&self.name, msg.as_ref(), true);
    }

    /// Set this step's progress, returning `self` for chaining with
    /// `.log()`/`.err()`.
    pub fn progress(self, p: u8) -> Self {
        self.logger.set_step_progress(&self.name, p);
        self
    }

    /// A line-buffering writer for subprocess stdout/stderr: emits one
    /// log entry per `\n`-terminated line, carrying a trailing partial
    /// line across calls. `\r\n` is tolerated as payload — only `\n`
    /// splits lines.
    pub fn line_writer(&self) -> StepLineWriter<'_> {
        StepLineWriter {
            step: self,
            buf: String::new(),
        }
    }
}

/// Line-buffering adapter; feed it raw bytes as they arrive.
pub struct StepLineWriter<'a> {
    step: &'a StepLogger,
    buf: String,
}

impl StepLineWriter<'_> {
    pub fn write(&mut self, chunk: &str) {
        for line in drain_lines(&mut self.buf, chunk) {
            self.step.log(line);
        }
    }

    /// Flush a trailing partial line (no terminating `\n` ever arrived).
    pub fn finish(mut self) {
        if !self.buf.is_empty() {
            let line = std::mem::take(&mut self.buf);
            self.step.log(line.trim_end_matches('\r'));
        }
    }
}

/// Split `chunk` onto `buf` and pull out every complete `\n`-terminated
/// line, leaving a trailing partial line in `buf` for the next call.
/// `\r\n` is tolerated as payload — only `\n` splits lines. Shared by
/// [`StepLineWriter`] and [`ConsoleLineWriter`].
fn drain_lines(buf: &mut String, chunk: &str) -> Vec<String> {
    buf.push_str(chunk);
    let mut lines = Vec::new();
    while let Some(pos) = buf.find('\n') {
        let line: String = buf.drain(..=pos).collect();
        lines.push(line.trim_end_matches(['\n', '\r']).to_string());
    }
    lines
}

/// A stateless logger with the same console/line-writer surface as a
/// [`StepLogger`], but no owning job, no progress tracking, and no
/// dispatcher channel: every call writes straight to stdout. For
/// callers that need to log without a `JobId` to attach the message
/// to (adapter and startup code that runs outside a dispatched job).
pub struct ConsoleSubLogger {
    label: String,
}

impl ConsoleSubLogger {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }

    pub fn log(&self, msg: impl AsRef<str>) {
        println!("\u{2714}\u{fe0f} {}: {}", self.label, msg.as_ref());
    }

    pub fn err(&self, msg: impl AsRef<str>) {
        println!("\u{2049}\u{fe0f} {}: {}", self.label, msg.as_ref());
    }

    pub fn line_writer(&self) -> ConsoleLineWriter<'_> {
        ConsoleLineWriter { logger: self, buf: String::new() }
    }
}

/// Line-buffering writer for [`ConsoleSubLogger`]; same semantics as
/// [`StepLineWriter`].
pub struct ConsoleLineWriter<'a> {
    logger: &'a ConsoleSubLogger,
    buf: String,
}

impl ConsoleLineWriter<'_> {
    pub fn write(&mut self, chunk: &str) {
        for line in drain_lines(&mut self.buf, chunk) {
            self.logger.log(line);
        }
    }

    pub fn finish(mut self) {
        if !self.buf.is_empty() {
            let line = std::mem::take(&mut self.buf);
            self.logger.log(line.trim_end_matches('\r'));
        }
    }
}

#[cfg(test)]
#[path = "action_logger_tests.rs"]
mod tests;
