// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Contracts for the external collaborators the dispatcher calls out
//! to: the pup manager, source manager, declarative system-config
//! writer, system updater, host-state reader, and log tailer. This
//! crate defines the narrow interfaces (§6); it never implements the
//! real pup runtime, the nix/declarative writer, or systemd — those are
//! out of scope here (§1).

mod error;
mod log_tailer;
mod nix_manager;
mod pup;
mod pup_manager;
mod source_manager;
mod state_manager;
mod system_updater;

pub use error::AdapterError;
pub use log_tailer::{LogTailer, TailHandle};
pub use nix_manager::{NixManager, Patch};
pub use pup::{HealthReport, HostState, PupManifest, PupMutation, PupState, PupStats, Pupdate, Source};
pub use pup_manager::PupManager;
pub use source_manager::SourceManager;
pub use state_manager::StateManager;
pub use system_updater::{JobOutcome, SystemUpdater};

#[cfg(any(test, feature = "test-support"))]
pub use log_tailer::FakeLogTailer;
#[cfg(any(test, feature = "test-support"))]
pub use nix_manager::{FakeNixManager, FakePatch, NixCall};
#[cfg(any(test, feature = "test-support"))]
pub use pup_manager::{FakePupManager, PupManagerCall};
#[cfg(any(test, feature = "test-support"))]
pub use source_manager::{FakeSourceManager, SourceManagerCall};
#[cfg(any(test, feature = "test-support"))]
pub use state_manager::FakeStateManager;
#[cfg(any(test, feature = "test-support"))]
pub use system_updater::{FakeSystemUpdater, UpdaterCall};

#[cfg(test)]
#[path = "fakes_tests.rs"]
mod fakes_tests;
