// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Web Push sender
//!
//! Encrypts notification payloads with the `aesgcm128` content encoding and
//! delivers them to a push service, falling back to the legacy GCM relay for
//! endpoints under its prefix.
//!
//! Most callers build a [`WebPushClient`] and call [`WebPushClient::send`].
//! The free functions [`send_notification`] and [`set_legacy_api_key`] share
//! one process-wide client whose initial settings come from
//! [`WebPushConfig::from_env`].

use std::sync::OnceLock;

pub mod crypto;
pub mod push;

pub use crypto::{decrypt_payload, encrypt_payload, CryptoError, EncryptedPayload};
pub use push::{
    LegacyKeyStore, Payload, PushError, PushMessage, PushOutcome, WebPushClient, WebPushConfig,
    WebPushError,
};

static LEGACY_KEY: OnceLock<LegacyKeyStore> = OnceLock::new();
static DEFAULT_CLIENT: OnceLock<WebPushClient> = OnceLock::new();

/// Process-wide legacy API key holder
///
/// Seeded from `WEBPUSH_GCM_API_KEY` on first use.
pub fn legacy_key_store() -> &'static LegacyKeyStore {
    LEGACY_KEY.get_or_init(|| {
        let store = LegacyKeyStore::new();
        if let Some(key) = WebPushConfig::from_env().legacy_api_key {
            store.set(key);
        }
        store
    })
}

/// Replace the process-wide legacy API key
///
/// Sends already in flight keep the key they started with.
pub fn set_legacy_api_key(key: impl Into<String>) {
    legacy_key_store().set(key);
}

fn default_client() -> Result<&'static WebPushClient, PushError> {
    if let Some(client) = DEFAULT_CLIENT.get() {
        return Ok(client);
    }
    let client = WebPushClient::new(&WebPushConfig::from_env())?
        .with_key_store(legacy_key_store().clone());
    Ok(DEFAULT_CLIENT.get_or_init(|| client))
}

/// Send one notification with the process-wide client
///
/// # Arguments
/// * `endpoint` - Subscription endpoint URL
/// * `ttl` - Seconds the push service may hold the message; `None` sends 0
/// * `subscriber_public_key` - Subscription `p256dh` key, required with a payload
/// * `payload` - Optional text or bytes
///
/// # Returns
/// The push service response body on any 2xx status
pub async fn send_notification(
    endpoint: &str,
    ttl: Option<u64>,
    subscriber_public_key: Option<&str>,
    payload: Option<Payload>,
) -> Result<String, PushError> {
    default_client()?
        .send_notification(endpoint, ttl, subscriber_public_key, payload)
        .await
}
