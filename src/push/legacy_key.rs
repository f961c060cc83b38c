// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared storage for the legacy GCM API key
//!
//! Writers replace the whole key; each send takes one snapshot up front so a
//! concurrent update never splits a request between two keys.

use std::sync::{Arc, RwLock};

use tracing::debug;

/// Thread-safe holder for the legacy API key
///
/// Clones share the same slot.
#[derive(Clone, Default)]
pub struct LegacyKeyStore {
    key: Arc<RwLock<Option<Arc<str>>>>,
}

impl LegacyKeyStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `key`
    pub fn with_key(key: impl Into<String>) -> Self {
        let store = Self::new();
        store.set(key);
        store
    }

    /// Replace the stored key
    ///
    /// An empty string clears it.
    pub fn set(&self, key: impl Into<String>) {
        let key = key.into();
        let value = if key.is_empty() {
            None
        } else {
            Some(Arc::from(key))
        };
        let mut guard = self.key.write().unwrap_or_else(|e| e.into_inner());
        *guard = value;
        debug!(configured = guard.is_some(), "Legacy API key updated");
    }

    /// Remove the stored key
    pub fn clear(&self) {
        let mut guard = self.key.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }

    /// Current key, if any
    pub fn snapshot(&self) -> Option<Arc<str>> {
        self.key.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Whether a key is configured
    pub fn is_set(&self) -> bool {
        self.key
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}

impl std::fmt::Debug for LegacyKeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacyKeyStore")
            .field("configured", &self.is_set())
            .finish()
    }
}
