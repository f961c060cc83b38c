// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Push message delivery
//!
//! Builds and sends Web Push requests. Standard endpoints get an
//! `aesgcm128`-encrypted body (see [`crate::crypto`]); endpoints under the
//! legacy GCM prefix get a JSON registration body authenticated with the
//! legacy API key.

pub mod classifier;
pub mod client;
pub mod config;
pub mod headers;
pub mod legacy_key;
pub mod router;
pub mod transport;
pub mod types;

pub use classifier::classify;
pub use client::WebPushClient;
pub use config::{WebPushConfig, DEFAULT_LEGACY_ENDPOINT};
pub use headers::{
    encryption_header, encryption_key_header, parse_encryption_header,
    parse_encryption_key_header, HeaderBuilder, PushRequest,
};
pub use legacy_key::LegacyKeyStore;
pub use router::{EndpointRouter, Route};
pub use transport::{HttpTransport, Transport, TransportFailure, TransportResponse};
pub use types::{Payload, PushError, PushMessage, PushOutcome, WebPushError};
