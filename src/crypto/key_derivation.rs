// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Content-encryption key and nonce derivation using HKDF-SHA256
//!
//! The info strings below are a wire contract with the push service: the
//! receiving browser rebuilds them byte for byte, so any change breaks
//! decryption on the other side.
//!
//! ```text
//! context = "P-256" 0x00
//!           || len16(subscriber key) || subscriber key
//!           || len16(server key)     || server key
//!
//! PRK   = HKDF-Extract(salt, IKM)
//! CEK   = HKDF-Expand(PRK, "Content-Encoding: aesgcm128" 0x00 || context, 16)
//! Nonce = HKDF-Expand(PRK, "Content-Encoding: nonce" 0x00 || context, 12)
//! ```
//!
//! IKM is the raw ECDH secret, or, when the subscription carries an auth
//! secret, `HKDF(auth, secret, "Content-Encoding: auth" 0x00, 32)`.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroize;

use super::error::CryptoError;

/// Info string for the optional auth-secret step
pub const AUTH_INFO: &[u8] = b"Content-Encoding: auth\0";

/// Info label for the content-encryption key
pub const CEK_INFO: &[u8] = b"Content-Encoding: aesgcm128\0";

/// Info label for the nonce
pub const NONCE_INFO: &[u8] = b"Content-Encoding: nonce\0";

/// Curve label that opens the key context
pub const CURVE_LABEL: &[u8] = b"P-256\0";

/// AES-128 key size
pub const CEK_SIZE: usize = 16;

/// AES-GCM nonce size
pub const NONCE_SIZE: usize = 12;

/// Salt size, fresh per message
pub const SALT_SIZE: usize = 16;

/// Subscription auth secret size
pub const AUTH_SECRET_SIZE: usize = 16;

const AUTH_IKM_SIZE: usize = 32;

/// Derived per-message key material. Zeroized on drop.
pub struct ContentKeys {
    cek: [u8; CEK_SIZE],
    nonce: [u8; NONCE_SIZE],
}

impl ContentKeys {
    /// 16-byte AES-128-GCM key
    pub fn cek(&self) -> &[u8; CEK_SIZE] {
        &self.cek
    }

    /// 12-byte AES-GCM nonce
    pub fn nonce(&self) -> &[u8; NONCE_SIZE] {
        &self.nonce
    }
}

impl Drop for ContentKeys {
    fn drop(&mut self) {
        self.cek.zeroize();
        self.nonce.zeroize();
    }
}

impl std::fmt::Debug for ContentKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ContentKeys([REDACTED])")
    }
}

/// Build the key context: curve label followed by both length-prefixed public keys.
///
/// Subscriber (receiver) key first, application server (sender) key second.
pub fn key_context(
    subscriber_public_key: &[u8],
    server_public_key: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let mut context = Vec::with_capacity(
        CURVE_LABEL.len() + 4 + subscriber_public_key.len() + server_public_key.len(),
    );
    context.extend_from_slice(CURVE_LABEL);
    for (name, key) in [
        ("subscriber_public_key", subscriber_public_key),
        ("application_server_public_key", server_public_key),
    ] {
        let len = u16::try_from(key.len()).map_err(|_| CryptoError::KeyDerivationFailed {
            operation: "key_context".to_string(),
            reason: format!("{} is {} bytes, longer than a 2-byte length", name, key.len()),
        })?;
        context.extend_from_slice(&len.to_be_bytes());
        context.extend_from_slice(key);
    }
    Ok(context)
}

/// Concatenate an info label and the key context
pub fn build_info(label: &[u8], context: &[u8]) -> Vec<u8> {
    let mut info = Vec::with_capacity(label.len() + context.len());
    info.extend_from_slice(label);
    info.extend_from_slice(context);
    info
}

/// Derive the CEK and nonce for one message
///
/// # Arguments
///
/// * `shared_secret` - Raw ECDH output
/// * `salt` - 16 random bytes, never reused
/// * `subscriber_public_key` - Uncompressed subscriber point
/// * `server_public_key` - Uncompressed ephemeral application-server point
/// * `auth_secret` - Optional subscription auth secret
pub fn derive_content_keys(
    shared_secret: &[u8],
    salt: &[u8; SALT_SIZE],
    subscriber_public_key: &[u8],
    server_public_key: &[u8],
    auth_secret: Option<&[u8]>,
) -> Result<ContentKeys, CryptoError> {
    let mut auth_ikm = [0u8; AUTH_IKM_SIZE];
    let ikm: &[u8] = match auth_secret {
        Some(auth) => {
            Hkdf::<Sha256>::new(Some(auth), shared_secret)
                .expand(AUTH_INFO, &mut auth_ikm)
                .map_err(|e| CryptoError::KeyDerivationFailed {
                    operation: "auth_secret".to_string(),
                    reason: e.to_string(),
                })?;
            &auth_ikm
        }
        None => shared_secret,
    };

    let hkdf = Hkdf::<Sha256>::new(Some(salt.as_slice()), ikm);
    let context = key_context(subscriber_public_key, server_public_key)?;

    let mut keys = ContentKeys {
        cek: [0u8; CEK_SIZE],
        nonce: [0u8; NONCE_SIZE],
    };
    let expanded = hkdf
        .expand(&build_info(CEK_INFO, &context), &mut keys.cek)
        .and_then(|()| hkdf.expand(&build_info(NONCE_INFO, &context), &mut keys.nonce));
    auth_ikm.zeroize();

    expanded.map_err(|e| CryptoError::KeyDerivationFailed {
        operation: "content_keys".to_string(),
        reason: e.to_string(),
    })?;

    Ok(keys)
}
