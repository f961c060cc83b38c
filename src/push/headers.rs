// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request construction for both transports
//!
//! Standard Web Push with payload:
//! ```text
//! Content-Encoding: aesgcm128
//! Encryption: keyid=p256dh;salt=<base64url>
//! Encryption-Key: keyid=p256dh;dh=<base64url>
//! Content-Type: application/octet-stream
//! Content-Length: <ciphertext length>
//! TTL: <seconds>
//! ```
//!
//! Without payload only `TTL` and `Content-Length: 0` are sent. The legacy
//! transport sends a JSON body naming the registration id and authenticates
//! with `Authorization: key=<api key>`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_ENCODING, CONTENT_LENGTH,
    CONTENT_TYPE,
};
use serde::Serialize;
use url::Url;

use super::types::PushError;
use crate::crypto::{CryptoError, EncryptedPayload};

/// Content coding token for this scheme
pub const CONTENT_ENCODING_AESGCM128: &str = "aesgcm128";

/// Key id shared by the `Encryption` and `Encryption-Key` headers
pub const KEY_ID: &str = "p256dh";

/// `Encryption` header name
pub const ENCRYPTION: HeaderName = HeaderName::from_static("encryption");

/// `Encryption-Key` header name
pub const ENCRYPTION_KEY: HeaderName = HeaderName::from_static("encryption-key");

/// `TTL` header name
pub const TTL: HeaderName = HeaderName::from_static("ttl");

/// A fully built request, ready for a transport
#[derive(Debug, Clone)]
pub struct PushRequest {
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Value of the `Encryption` header
pub fn encryption_header(salt: &[u8]) -> String {
    format!("keyid={};salt={}", KEY_ID, URL_SAFE_NO_PAD.encode(salt))
}

/// Value of the `Encryption-Key` header
pub fn encryption_key_header(server_public_key: &[u8]) -> String {
    format!("keyid={};dh={}", KEY_ID, URL_SAFE_NO_PAD.encode(server_public_key))
}

/// Find `name=` in a `;`-separated parameter list and decode its value
fn header_param(value: &str, name: &str) -> Result<Vec<u8>, CryptoError> {
    let raw = value
        .split(';')
        .filter_map(|param| param.trim().split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
        .map(|(_, v)| v.trim().trim_matches('"').trim_end_matches('='))
        .ok_or_else(|| CryptoError::invalid_key(name, "parameter missing from header"))?;

    Ok(URL_SAFE_NO_PAD.decode(raw)?)
}

/// Extract the salt from an `Encryption` header value
pub fn parse_encryption_header(value: &str) -> Result<Vec<u8>, CryptoError> {
    header_param(value, "salt")
}

/// Extract the sender public key from an `Encryption-Key` header value
pub fn parse_encryption_key_header(value: &str) -> Result<Vec<u8>, CryptoError> {
    header_param(value, "dh")
}

#[derive(Serialize)]
struct LegacyBody<'a> {
    registration_ids: [&'a str; 1],
}

/// Builds the header set for each kind of request
pub struct HeaderBuilder;

impl HeaderBuilder {
    /// Standard transport with an encrypted payload
    pub fn encrypted(
        url: Url,
        encrypted: EncryptedPayload,
        ttl: u64,
    ) -> Result<PushRequest, PushError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_ENCODING,
            HeaderValue::from_static(CONTENT_ENCODING_AESGCM128),
        );
        headers.insert(ENCRYPTION, header_value(encryption_header(&encrypted.salt))?);
        headers.insert(
            ENCRYPTION_KEY,
            header_value(encryption_key_header(&encrypted.server_public_key))?,
        );
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/octet-stream"),
        );
        headers.insert(CONTENT_LENGTH, HeaderValue::from(encrypted.ciphertext.len()));
        headers.insert(TTL, HeaderValue::from(ttl));

        Ok(PushRequest {
            url,
            headers,
            body: encrypted.ciphertext,
        })
    }

    /// Standard transport without a payload
    pub fn empty(url: Url, ttl: u64) -> PushRequest {
        let mut headers = HeaderMap::new();
        headers.insert(TTL, HeaderValue::from(ttl));
        headers.insert(CONTENT_LENGTH, HeaderValue::from(0u64));

        PushRequest {
            url,
            headers,
            body: Vec::new(),
        }
    }

    /// Legacy transport; the API key is never logged
    pub fn legacy(
        relay: Url,
        registration_id: &str,
        api_key: &str,
    ) -> Result<PushRequest, PushError> {
        let body = serde_json::to_vec(&LegacyBody {
            registration_ids: [registration_id],
        })
        .map_err(|e| PushError::configuration(format!("failed to encode legacy body: {}", e)))?;

        let mut authorization =
            HeaderValue::from_str(&format!("key={}", api_key)).map_err(|_| {
                PushError::configuration("legacy API key is not a valid header value")
            })?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));

        Ok(PushRequest {
            url: relay,
            headers,
            body,
        })
    }
}

fn header_value(value: String) -> Result<HeaderValue, PushError> {
    HeaderValue::from_str(&value)
        .map_err(|e| PushError::configuration(format!("invalid header value: {}", e)))
}
