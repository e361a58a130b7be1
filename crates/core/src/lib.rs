// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dbxd-core: data model for the control-plane action dispatch and
//! job-lifecycle engine.
//!
//! This crate has no knowledge of sockets, subprocesses, or SQL — it is
//! the pure, synchronously-testable heart of the system: [`Action`] in,
//! [`Change`] out.

pub mod action;
pub mod change;
pub mod clock;
pub mod config_field;
pub mod error;
pub mod id;
pub mod job;
pub mod job_record;
pub mod progress;

pub use action::{Action, InstallPupSpec};
pub use change::{Change, ChangeType};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config_field::{
    extract_defaults, needs_values, normalize, ConfigFieldType, ManifestConfigField,
};
pub use error::CoreError;
pub use id::ShortId;
pub use job::{Job, JobConfig};
pub use job_record::{JobRecord, JobStatus};
pub use progress::ActionProgress;

crate::define_id! {
    /// Unique identifier for a job instance (16 random bytes, hex-encoded).
    #[derive(Default)]
    pub struct JobId;
}

impl JobId {
    /// Generate a fresh, randomly-chosen job id.
    ///
    /// 16 random bytes hex-encoded to a 32-character string, per the
    /// activity-view id contract.
    pub fn random() -> Self {
        use rand::RngCore;
        let mut bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut bytes);
        Self(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }

    /// Derive a child id for the `i`-th element of a batch action.
    ///
    /// Batch ids are not persisted in a parent/child table (see
    /// `InstallPups` handling); this is purely a display/lookup
    /// convenience.
    pub fn child(&self, index: usize) -> Self {
        Self(format!("{}-{}", self.0, index))
    }
}
