// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Payload encryption for a single push message
//!
//! Ties the primitives together: fresh ephemeral key pair and salt, ECDH with
//! the subscriber, HKDF for CEK and nonce, framing, then AES-128-GCM.

use p256::SecretKey;
use rand::{rngs::OsRng, RngCore};

use super::aes_gcm::{decrypt_record, encrypt_record};
use super::ecdh::{
    agree_with_secret, encode_point, EphemeralKeyPair, SubscriberPublicKey, PUBLIC_KEY_SIZE,
};
use super::error::CryptoError;
use super::framing::{frame, unframe, MAX_RECORD_SIZE};
use super::key_derivation::{derive_content_keys, SALT_SIZE};

/// Everything the header builder needs from an encrypted message
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedPayload {
    /// Sealed frame with tag appended
    pub ciphertext: Vec<u8>,
    /// Salt used for HKDF extract, sent in `Encryption: salt=`
    pub salt: [u8; SALT_SIZE],
    /// Ephemeral application-server public key, sent in `Encryption-Key: dh=`
    pub server_public_key: [u8; PUBLIC_KEY_SIZE],
}

impl std::fmt::Debug for EncryptedPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedPayload")
            .field("ciphertext_len", &self.ciphertext.len())
            .field("server_public_key", &hex::encode(self.server_public_key))
            .finish()
    }
}

/// Encrypt a payload for one subscriber
///
/// # Arguments
///
/// * `subscriber` - Validated subscriber public key
/// * `payload` - Raw payload bytes (text callers encode to UTF-8 first)
/// * `pad_size` - Number of zero padding bytes
/// * `auth_secret` - Optional subscription auth secret
///
/// # Security
///
/// A new key pair and salt are drawn for every call; nothing is cached.
pub fn encrypt_payload(
    subscriber: &SubscriberPublicKey,
    payload: &[u8],
    pad_size: u16,
    auth_secret: Option<&[u8]>,
) -> Result<EncryptedPayload, CryptoError> {
    // Reject oversized input before drawing any key material
    if usize::from(pad_size) + payload.len() > MAX_RECORD_SIZE {
        return Err(CryptoError::PayloadTooLarge {
            size: usize::from(pad_size) + payload.len(),
            max: MAX_RECORD_SIZE,
        });
    }

    let mut salt = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt);

    encrypt_with(
        subscriber,
        payload,
        pad_size,
        auth_secret,
        EphemeralKeyPair::generate(),
        salt,
    )
}

/// Deterministic core of [`encrypt_payload`]; the caller supplies the randomness.
pub(crate) fn encrypt_with(
    subscriber: &SubscriberPublicKey,
    payload: &[u8],
    pad_size: u16,
    auth_secret: Option<&[u8]>,
    key_pair: EphemeralKeyPair,
    salt: [u8; SALT_SIZE],
) -> Result<EncryptedPayload, CryptoError> {
    let plaintext = frame(payload, pad_size)?;
    let server_public_key = *key_pair.public_key_bytes();

    let shared_secret = key_pair.agree(subscriber);
    let keys = derive_content_keys(
        shared_secret.as_bytes(),
        &salt,
        subscriber.as_bytes(),
        &server_public_key,
        auth_secret,
    )?;

    let ciphertext = encrypt_record(&plaintext, keys.cek(), keys.nonce())?;

    Ok(EncryptedPayload {
        ciphertext,
        salt,
        server_public_key,
    })
}

/// Decrypt a payload on the subscriber side
///
/// # Arguments
///
/// * `subscriber_secret` - The subscriber's P-256 private key
/// * `server_public_key` - Value of `Encryption-Key: dh=`
/// * `salt` - Value of `Encryption: salt=`
/// * `ciphertext` - Request body
/// * `auth_secret` - Auth secret, if the sender used one
pub fn decrypt_payload(
    subscriber_secret: &SecretKey,
    server_public_key: &[u8],
    salt: &[u8],
    ciphertext: &[u8],
    auth_secret: Option<&[u8]>,
) -> Result<Vec<u8>, CryptoError> {
    let salt: &[u8; SALT_SIZE] = salt.try_into().map_err(|_| CryptoError::DecryptionFailed {
        reason: format!("salt must be {} bytes, got {}", SALT_SIZE, salt.len()),
    })?;

    let subscriber_public = encode_point(&subscriber_secret.public_key());
    let shared_secret = agree_with_secret(subscriber_secret, server_public_key)?;
    let keys = derive_content_keys(
        shared_secret.as_bytes(),
        salt,
        &subscriber_public,
        server_public_key,
        auth_secret,
    )?;

    let plaintext = decrypt_record(ciphertext, keys.cek(), keys.nonce())?;
    Ok(unframe(&plaintext)?.to_vec())
}
