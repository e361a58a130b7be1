// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! dbxd — the pup-install control-plane daemon.
//!
//! Loads configuration, opens the durable job store, and runs the
//! dispatcher's select loop until a signal or an explicit shutdown
//! request stops it.
//!
//! Concrete implementations of `PupManager`, `SourceManager`,
//! `NixManager`, `SystemUpdater`, `StateManager` and `LogTailer` (the
//! container runtime, manifest registry, declarative rebuild CLI, …)
//! live outside this crate. Until they are wired in, this binary runs
//! the dispatcher against the in-memory test-support doubles so the
//! process is runnable end-to-end during development.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod env;
mod lifecycle;

use std::sync::Arc;

use dbxd_adapters::{FakeLogTailer, FakeNixManager, FakePupManager, FakeSourceManager, FakeStateManager, FakeSystemUpdater};
use dbxd_core::SystemClock;
use dbxd_engine::{Dispatcher, DispatcherConfig, DispatcherDeps};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

use crate::lifecycle::{Config, LifecycleError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("dbxd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("dbxd {}", env!("CARGO_PKG_VERSION"));
                println!("Pup-install control-plane daemon.");
                println!();
                println!("USAGE:");
                println!("    dbxd");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: dbxd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let config = Config::load()?;
    lifecycle::prepare_directories(&config)?;
    rotate_log_if_needed(&config.log_path);
    write_startup_marker(&config)?;
    let log_guard = setup_logging(&config)?;

    info!("starting dbxd");

    let _lock = match lifecycle::acquire_lock(&config) {
        Ok(lock) => lock,
        Err(LifecycleError::LockFailed(_)) => {
            let pid = std::fs::read_to_string(&config.lock_path).unwrap_or_default();
            eprintln!("dbxd is already running");
            if !pid.trim().is_empty() {
                eprintln!("  pid: {}", pid.trim());
            }
            std::process::exit(1);
        }
        Err(e) => {
            error!(error = %e, "failed to start dbxd");
            drop(log_guard);
            return Err(e.into());
        }
    };

    let store = Arc::new(lifecycle::open_job_store(&config)?);

    let dispatcher = Dispatcher::new(
        DispatcherDeps {
            pup_manager: FakePupManager::new(),
            source_manager: FakeSourceManager::new(),
            nix_manager: FakeNixManager::new(),
            system_updater: FakeSystemUpdater::new(),
            state_manager: FakeStateManager::default(),
            log_tailer: FakeLogTailer::new(),
        },
        SystemClock,
        DispatcherConfig { log_dir: config.container_log_dir.clone() },
        store,
    );

    // Held open for the life of the process: production adapters will
    // supply these from the real pup-manager's reconciliation loop.
    let (_pup_updates_tx, pup_updates_rx) = tokio::sync::mpsc::channel(16);
    let (_pup_stats_tx, pup_stats_rx) = tokio::sync::mpsc::channel(16);

    let (started_tx, started_rx) = tokio::sync::oneshot::channel();
    let (stopped_tx, stopped_rx) = tokio::sync::oneshot::channel();
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel();

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let run_handle = tokio::spawn(async move {
        dispatcher.run(pup_updates_rx, pup_stats_rx, started_tx, stopped_tx, stop_rx).await;
    });

    let _ = started_rx.await;
    info!("dbxd ready");
    println!("READY");

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM, shutting down..."),
        _ = sigint.recv() => info!("received SIGINT, shutting down..."),
    }

    let _ = stop_tx.send(());
    let _ = stopped_rx.await;
    let _ = run_handle.await;

    info!("dbxd stopped");
    Ok(())
}

/// Maximum log file size before rotation (10 MB).
const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;

/// Number of rotated log files to keep (daemon.log.1, .2, .3).
const MAX_ROTATED_LOGS: u32 = 3;

/// Rotate the daemon log file if it exceeds [`MAX_LOG_SIZE`].
///
/// Shifts `daemon.log` → `daemon.log.1` → `daemon.log.2` → `daemon.log.3`,
/// deleting the oldest. Best-effort: rotation failures are silently
/// ignored so the daemon still starts.
fn rotate_log_if_needed(log_path: &std::path::Path) {
    let size = match std::fs::metadata(log_path) {
        Ok(m) => m.len(),
        Err(_) => return,
    };
    if size < MAX_LOG_SIZE {
        return;
    }

    let log_str = log_path.display().to_string();
    for i in (1..MAX_ROTATED_LOGS).rev() {
        let from = format!("{log_str}.{i}");
        let to = format!("{log_str}.{}", i + 1);
        let _ = std::fs::rename(&from, &to);
    }
    let _ = std::fs::rename(log_path, format!("{log_str}.1"));
}

/// Startup marker prefix written to the log before anything else so the
/// boundary between runs is easy to find when scanning the raw file.
const STARTUP_MARKER_PREFIX: &str = "--- dbxd: starting (pid: ";

fn write_startup_marker(config: &Config) -> Result<(), LifecycleError> {
    use std::io::Write;

    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::OpenOptions::new().create(true).append(true).open(&config.log_path)?;
    writeln!(file, "{}{}) ---", STARTUP_MARKER_PREFIX, std::process::id())?;
    Ok(())
}

fn setup_logging(config: &Config) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file_appender = tracing_appender::rolling::never(
        config.log_path.parent().ok_or(LifecycleError::NoStateDir)?,
        config.log_path.file_name().ok_or(LifecycleError::NoStateDir)?,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(non_blocking)).init();

    Ok(guard)
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
