// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! dbxd daemon library: configuration and lifecycle plumbing shared
//! between the `dbxd` binary and its tests. The dispatcher itself
//! lives in `dbxd-engine`; this crate only wires it to a host process.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod env;
mod lifecycle;

pub use lifecycle::{acquire_lock, open_job_store, prepare_directories, Config, LifecycleError, LockGuard};
