// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for push message delivery

use reqwest::header::HeaderMap;
use thiserror::Error;

use crate::crypto::CryptoError;

/// Message payload, typed at the boundary
///
/// Text is UTF-8 encoded exactly once, when the bytes are taken for framing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// UTF-8 text
    Text(String),
    /// Raw bytes
    Bytes(Vec<u8>),
}

impl Payload {
    /// Bytes to be framed and encrypted
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Text(text) => text.as_bytes(),
            Payload::Bytes(bytes) => bytes,
        }
    }

    /// Length in bytes after encoding
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whether the payload has no bytes (still encrypted when present)
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Bytes(bytes)
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Payload::Bytes(bytes.to_vec())
    }
}

/// A single push message: the unit of work for one send
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushMessage {
    /// Push service endpoint URL from the subscription
    pub endpoint: String,
    /// Time to live in seconds; `None` sends `TTL: 0`
    pub ttl: Option<u64>,
    /// Subscriber `p256dh` key, URL-safe base64
    pub subscriber_public_key: Option<String>,
    /// Subscriber `auth` secret, URL-safe base64
    pub auth_secret: Option<String>,
    /// Payload; `None` sends no body and no encryption headers
    pub payload: Option<Payload>,
    /// Padding override for this message; `None` uses the client default
    pub pad_size: Option<u16>,
}

impl PushMessage {
    /// Create a message with no payload and default TTL
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Set the TTL in seconds
    pub fn with_ttl(mut self, ttl: u64) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Set the subscriber public key (URL-safe base64, uncompressed P-256 point)
    pub fn with_subscriber_key(mut self, key: impl Into<String>) -> Self {
        self.subscriber_public_key = Some(key.into());
        self
    }

    /// Set the subscription auth secret (URL-safe base64)
    pub fn with_auth_secret(mut self, secret: impl Into<String>) -> Self {
        self.auth_secret = Some(secret.into());
        self
    }

    /// Attach a payload
    pub fn with_payload(mut self, payload: impl Into<Payload>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Override the padding length for this message
    pub fn with_pad_size(mut self, pad_size: u16) -> Self {
        self.pad_size = Some(pad_size);
        self
    }

    /// TTL header value
    pub fn ttl_or_default(&self) -> u64 {
        self.ttl.unwrap_or(0)
    }
}

/// The push service answered with a non-success status
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct WebPushError {
    /// Endpoint the request was sent to
    pub endpoint: String,
    /// HTTP status code
    pub status_code: u16,
    /// Response headers, verbatim
    pub headers: HeaderMap,
    /// Response body, verbatim
    pub body: String,
    /// Human-readable summary
    pub message: String,
}

impl WebPushError {
    /// Build from a response; the message is derived from the status
    pub fn new(
        endpoint: impl Into<String>,
        status_code: u16,
        headers: HeaderMap,
        body: String,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            status_code,
            headers,
            body,
            message: format!("Received unexpected response code {}", status_code),
        }
    }

    /// 404 or 410: the subscription no longer exists and should be discarded
    pub fn is_subscription_gone(&self) -> bool {
        matches!(self.status_code, 404 | 410)
    }
}

/// Result of a send that reached the push service
#[derive(Debug, Clone)]
pub enum PushOutcome {
    /// 2xx; carries the response body
    Resolved(String),
    /// Any other status
    Rejected(WebPushError),
}

impl PushOutcome {
    /// Whether the push service accepted the message
    pub fn is_resolved(&self) -> bool {
        matches!(self, PushOutcome::Resolved(_))
    }

    /// Fold the rejection into the error channel
    pub fn into_result(self) -> Result<String, PushError> {
        match self {
            PushOutcome::Resolved(body) => Ok(body),
            PushOutcome::Rejected(err) => Err(PushError::Rejected(err)),
        }
    }
}

/// Errors that can occur while sending a push message
#[derive(Debug, Error)]
pub enum PushError {
    /// Subscriber key or auth secret is malformed or not on P-256
    #[error("Key agreement failed: {0}")]
    KeyAgreement(CryptoError),

    /// The message cannot be sent as configured; raised before any network I/O
    #[error("Configuration error: {reason}")]
    Configuration {
        /// What is wrong
        reason: String,
    },

    /// Endpoint URL could not be parsed or routed
    #[error("Invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint {
        /// Endpoint as given
        endpoint: String,
        /// Why it was rejected
        reason: String,
    },

    /// No HTTP response was received
    #[error("Transport error for {endpoint}: {reason}")]
    Transport {
        /// Endpoint the request was sent to
        endpoint: String,
        /// Underlying failure
        reason: String,
        /// Whether the transport gave up on a timeout
        timed_out: bool,
    },

    /// The push service answered with a non-success status
    #[error(transparent)]
    Rejected(WebPushError),

    /// Encryption failed internally; never retryable
    #[error("Internal encryption error: {0}")]
    Internal(CryptoError),
}

impl PushError {
    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        PushError::Configuration {
            reason: reason.into(),
        }
    }

    /// Whether a caller-side retry could plausibly succeed
    ///
    /// Transport failures, 429 and 5xx rejections qualify. The client never
    /// retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            PushError::Transport { .. } => true,
            PushError::Rejected(err) => err.status_code == 429 || err.status_code >= 500,
            _ => false,
        }
    }

    /// The push service rejection, if this is one
    pub fn as_web_push_error(&self) -> Option<&WebPushError> {
        match self {
            PushError::Rejected(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CryptoError> for PushError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::InvalidKey { .. } => PushError::KeyAgreement(err),
            CryptoError::PayloadTooLarge { .. } => PushError::Configuration {
                reason: err.to_string(),
            },
            _ => PushError::Internal(err),
        }
    }
}
