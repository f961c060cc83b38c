// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Push client orchestration
//!
//! Routes the endpoint, builds the complete request (encrypting the payload
//! when there is one), hands it to the transport once, and classifies the
//! response. Every check that can fail happens before the transport is
//! called, so a failed send never leaves a partial request on the wire.

use std::sync::Arc;
use std::time::{Duration, Instant};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use tracing::{debug, info, warn};

use super::classifier::classify;
use super::config::WebPushConfig;
use super::headers::{HeaderBuilder, PushRequest};
use super::legacy_key::LegacyKeyStore;
use super::router::{EndpointRouter, Route};
use super::transport::{HttpTransport, Transport};
use super::types::{Payload, PushError, PushMessage, PushOutcome};
use crate::crypto::{
    encrypt_payload, CryptoError, EncryptedPayload, SubscriberPublicKey, AUTH_SECRET_SIZE,
};

/// Sends push messages over the standard or legacy transport
#[derive(Clone)]
pub struct WebPushClient {
    transport: Arc<dyn Transport>,
    router: EndpointRouter,
    legacy_key: LegacyKeyStore,
    pad_size: u16,
}

impl WebPushClient {
    /// Create a client with an HTTP transport
    pub fn new(config: &WebPushConfig) -> Result<Self, PushError> {
        config.validate().map_err(PushError::configuration)?;

        let transport = match config.request_timeout_ms {
            Some(ms) => HttpTransport::with_timeout(Duration::from_millis(ms))?,
            None => HttpTransport::new()?,
        };
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client with a caller-supplied transport
    pub fn with_transport(
        config: &WebPushConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, PushError> {
        config.validate().map_err(PushError::configuration)?;

        let legacy_key = LegacyKeyStore::new();
        if let Some(key) = &config.legacy_api_key {
            legacy_key.set(key.as_str());
        }

        debug!(
            pad_size = config.pad_size,
            legacy_prefix = %config.legacy_endpoint_prefix,
            "Web push client created"
        );

        Ok(Self {
            transport,
            router: EndpointRouter::new(&config.legacy_endpoint_prefix)?,
            legacy_key,
            pad_size: config.pad_size,
        })
    }

    /// Share an existing key store instead of the one built from config
    pub fn with_key_store(mut self, store: LegacyKeyStore) -> Self {
        self.legacy_key = store;
        self
    }

    /// Replace the legacy API key for subsequent sends
    pub fn set_legacy_api_key(&self, key: impl Into<String>) {
        self.legacy_key.set(key);
    }

    /// The key store this client reads from
    pub fn legacy_key_store(&self) -> &LegacyKeyStore {
        &self.legacy_key
    }

    pub fn router(&self) -> &EndpointRouter {
        &self.router
    }

    /// Build the full request for a message without sending it
    ///
    /// # Errors
    ///
    /// - `InvalidEndpoint` if the endpoint does not parse or route
    /// - `Configuration` for a payload on the legacy transport, a payload
    ///   without a subscriber key, a missing legacy API key, or an oversized
    ///   payload
    /// - `KeyAgreement` for a malformed subscriber key or auth secret
    pub fn build_request(&self, message: &PushMessage) -> Result<PushRequest, PushError> {
        match self.router.route(&message.endpoint)? {
            Route::Legacy {
                relay,
                registration_id,
            } => {
                if message.payload.is_some() {
                    return Err(PushError::configuration(
                        "payload unsupported on legacy transport",
                    ));
                }
                let api_key = self.legacy_key.snapshot().ok_or_else(|| {
                    PushError::configuration("legacy API key is not configured")
                })?;
                HeaderBuilder::legacy(relay, &registration_id, &api_key)
            }
            Route::Standard { endpoint } => match &message.payload {
                Some(payload) => {
                    let encrypted = self.encrypt(message, payload)?;
                    HeaderBuilder::encrypted(endpoint, encrypted, message.ttl_or_default())
                }
                None => Ok(HeaderBuilder::empty(endpoint, message.ttl_or_default())),
            },
        }
    }

    fn encrypt(
        &self,
        message: &PushMessage,
        payload: &Payload,
    ) -> Result<EncryptedPayload, PushError> {
        let encoded_key = message.subscriber_public_key.as_deref().ok_or_else(|| {
            PushError::configuration("payload requires a subscriber public key")
        })?;
        let subscriber = SubscriberPublicKey::from_base64url(encoded_key)?;
        let auth_secret = message
            .auth_secret
            .as_deref()
            .map(decode_auth_secret)
            .transpose()?;

        let pad_size = message.pad_size.unwrap_or(self.pad_size);
        Ok(encrypt_payload(
            &subscriber,
            payload.as_bytes(),
            pad_size,
            auth_secret.as_deref(),
        )?)
    }

    /// Send a message and return the classified outcome
    ///
    /// `Ok` means the push service answered; `Rejected` carries its status.
    /// `Err` means the request was never built or no response arrived.
    pub async fn dispatch(&self, message: &PushMessage) -> Result<PushOutcome, PushError> {
        let request = self.build_request(message)?;
        let host = request.url.host_str().unwrap_or_default().to_string();
        let legacy = self.router.is_legacy(&request.url);

        debug!(
            host = %host,
            legacy,
            ttl = message.ttl_or_default(),
            body_len = request.body.len(),
            "Dispatching push message"
        );

        let start = Instant::now();
        let response = self.transport.send(request).await.map_err(|e| {
            warn!(host = %host, timed_out = e.timed_out, "Push transport failed: {}", e);
            PushError::Transport {
                endpoint: message.endpoint.clone(),
                reason: e.reason,
                timed_out: e.timed_out,
            }
        })?;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        let status = response.status;
        let outcome = classify(&message.endpoint, response);
        match &outcome {
            PushOutcome::Resolved(_) => {
                info!(host = %host, status, elapsed_ms, "Push message accepted");
            }
            PushOutcome::Rejected(err) => {
                warn!(
                    host = %host,
                    status,
                    elapsed_ms,
                    subscription_gone = err.is_subscription_gone(),
                    "Push message rejected"
                );
            }
        }
        Ok(outcome)
    }

    /// Send a message; rejections become `PushError::Rejected`
    pub async fn send(&self, message: &PushMessage) -> Result<String, PushError> {
        self.dispatch(message).await?.into_result()
    }

    /// Positional form of [`send`](Self::send)
    pub async fn send_notification(
        &self,
        endpoint: &str,
        ttl: Option<u64>,
        subscriber_public_key: Option<&str>,
        payload: Option<Payload>,
    ) -> Result<String, PushError> {
        let message = PushMessage {
            endpoint: endpoint.to_string(),
            ttl,
            subscriber_public_key: subscriber_public_key.map(str::to_string),
            payload,
            ..PushMessage::default()
        };
        self.send(&message).await
    }
}

impl std::fmt::Debug for WebPushClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebPushClient")
            .field("router", &self.router)
            .field("legacy_key", &self.legacy_key)
            .field("pad_size", &self.pad_size)
            .finish_non_exhaustive()
    }
}

fn decode_auth_secret(encoded: &str) -> Result<Vec<u8>, CryptoError> {
    let secret = URL_SAFE_NO_PAD
        .decode(encoded.trim().trim_end_matches('='))
        .map_err(|e| {
            CryptoError::invalid_key("auth_secret", format!("base64url decode error: {}", e))
        })?;
    if secret.len() != AUTH_SECRET_SIZE {
        return Err(CryptoError::invalid_key(
            "auth_secret",
            format!("expected {} bytes, got {}", AUTH_SECRET_SIZE, secret.len()),
        ));
    }
    Ok(secret)
}
