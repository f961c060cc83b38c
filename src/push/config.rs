// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the push sender

use std::env;

use url::Url;

use crate::crypto::MAX_RECORD_SIZE;

/// Default endpoint prefix for the legacy GCM transport
pub const DEFAULT_LEGACY_ENDPOINT: &str = "https://android.googleapis.com/gcm/send";

/// Configuration for sending push messages
#[derive(Clone)]
pub struct WebPushConfig {
    /// API key for the legacy GCM transport
    pub legacy_api_key: Option<String>,
    /// Default number of zero padding bytes per message
    pub pad_size: u16,
    /// Request timeout in milliseconds; `None` leaves requests unbounded
    pub request_timeout_ms: Option<u64>,
    /// Endpoint prefix that selects the legacy transport
    pub legacy_endpoint_prefix: String,
}

impl std::fmt::Debug for WebPushConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebPushConfig")
            .field(
                "legacy_api_key",
                &self.legacy_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("pad_size", &self.pad_size)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("legacy_endpoint_prefix", &self.legacy_endpoint_prefix)
            .finish()
    }
}

impl WebPushConfig {
    /// Load configuration from environment variables
    ///
    /// Unparseable numeric values fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            legacy_api_key: env::var("WEBPUSH_GCM_API_KEY")
                .ok()
                .filter(|v| !v.is_empty()),
            pad_size: env::var("WEBPUSH_PAD_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            request_timeout_ms: env::var("WEBPUSH_REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok()),
            legacy_endpoint_prefix: env::var("WEBPUSH_LEGACY_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_LEGACY_ENDPOINT.to_string()),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if usize::from(self.pad_size) >= MAX_RECORD_SIZE {
            return Err(format!(
                "Pad size {} leaves no room for payload in a {} byte record",
                self.pad_size, MAX_RECORD_SIZE
            ));
        }
        if self.request_timeout_ms == Some(0) {
            return Err("Request timeout must be greater than 0".to_string());
        }
        let prefix = Url::parse(&self.legacy_endpoint_prefix)
            .map_err(|e| format!("Invalid legacy endpoint prefix: {}", e))?;
        if prefix.cannot_be_a_base() {
            return Err("Legacy endpoint prefix must be a hierarchical URL".to_string());
        }
        Ok(())
    }

    /// Set the legacy API key
    pub fn with_legacy_api_key(mut self, key: impl Into<String>) -> Self {
        self.legacy_api_key = Some(key.into());
        self
    }

    /// Set the default pad size
    pub fn with_pad_size(mut self, pad_size: u16) -> Self {
        self.pad_size = pad_size;
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = Some(timeout_ms);
        self
    }

    /// Point the legacy transport at a different prefix
    pub fn with_legacy_endpoint_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.legacy_endpoint_prefix = prefix.into();
        self
    }
}

impl Default for WebPushConfig {
    fn default() -> Self {
        Self {
            legacy_api_key: None,
            pad_size: 0,
            request_timeout_ms: None,
            legacy_endpoint_prefix: DEFAULT_LEGACY_ENDPOINT.to_string(),
        }
    }
}
