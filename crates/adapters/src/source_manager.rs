// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolves an `InstallPup` request's `(sourceId, name, version)` triple
//! to a concrete manifest.

use crate::{AdapterError, PupManifest, Source};
use async_trait::async_trait;

#[async_trait]
pub trait SourceManager: Clone + Send + Sync + 'static {
    async fn get_source_manifest(
        &self,
        source_id: &str,
        name: &str,
        version: &str,
    ) -> Result<(PupManifest, Source), AdapterError>;
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSourceManager, SourceManagerCall};

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use dbxd_core::ManifestConfigField;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    pub struct SourceManagerCall {
        pub source_id: String,
        pub name: String,
        pub version: String,
    }

    struct FakeState {
        manifests: HashMap<(String, String), (PupManifest, Source)>,
        calls: Vec<SourceManagerCall>,
    }

    /// In-memory source resolver: manifests are keyed by `(sourceId,
    /// name)`, ignoring version (the fake always "resolves" whatever
    /// version was asked for).
    #[derive(Clone)]
    pub struct FakeSourceManager {
        inner: Arc<Mutex<FakeState>>,
    }

    impl Default for FakeSourceManager {
        fn default() -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeState {
                    manifests: HashMap::new(),
                    calls: Vec::new(),
                })),
            }
        }
    }

    impl FakeSourceManager {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> Vec<SourceManagerCall> {
            self.inner.lock().calls.clone()
        }

        pub fn register(&self, source_id: &str, name: &str, config_fields: Vec<ManifestConfigField>) {
            let manifest = PupManifest {
                name: name.to_string(),
                version: "1.0".to_string(),
                config_fields,
            };
            let source = Source { id: source_id.to_string() };
            self.inner
                .lock()
                .manifests
                .insert((source_id.to_string(), name.to_string()), (manifest, source));
        }
    }

    #[async_trait]
    impl SourceManager for FakeSourceManager {
        async fn get_source_manifest(
            &self,
            source_id: &str,
            name: &str,
            version: &str,
        ) -> Result<(PupManifest, Source), AdapterError> {
            let mut inner = self.inner.lock();
            inner.calls.push(SourceManagerCall {
                source_id: source_id.to_string(),
                name: name.to_string(),
                version: version.to_string(),
            });
            inner
                .manifests
                .get(&(source_id.to_string(), name.to_string()))
                .cloned()
                .ok_or_else(|| AdapterError::ResolveFailed(format!("no manifest for {name} in source {source_id}")))
        }
    }
}
