// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn rotate_log_if_needed_is_a_noop_under_the_size_threshold() {
    let tmp = tempfile::tempdir().unwrap();
    let log_path = tmp.path().join("daemon.log");
    std::fs::write(&log_path, b"small").unwrap();

    rotate_log_if_needed(&log_path);

    assert_eq!(std::fs::read(&log_path).unwrap(), b"small");
    assert!(!log_path.with_extension("log.1").exists());
}

#[test]
fn rotate_log_if_needed_shifts_past_the_size_threshold() {
    let tmp = tempfile::tempdir().unwrap();
    let log_path = tmp.path().join("daemon.log");
    std::fs::write(&log_path, vec![0u8; (MAX_LOG_SIZE + 1) as usize]).unwrap();

    rotate_log_if_needed(&log_path);

    assert!(!log_path.exists());
    assert!(std::path::Path::new(&format!("{}.1", log_path.display())).exists());
}

#[test]
fn write_startup_marker_appends_a_pid_line() {
    let tmp = tempfile::tempdir().unwrap();
    let config = Config {
        state_dir: tmp.path().to_path_buf(),
        lock_path: tmp.path().join("daemon.pid"),
        version_path: tmp.path().join("daemon.version"),
        log_path: tmp.path().join("daemon.log"),
        db_path: tmp.path().join("jobs.db"),
        container_log_dir: tmp.path().join("logs"),
    };

    write_startup_marker(&config).unwrap();

    let contents = std::fs::read_to_string(&config.log_path).unwrap();
    assert!(contents.contains(STARTUP_MARKER_PREFIX));
    assert!(contents.contains(&std::process::id().to_string()));
}
