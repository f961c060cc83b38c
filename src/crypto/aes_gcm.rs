// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! AES-128-GCM record encryption
//!
//! **Record Format**:
//! ```text
//! [ciphertext (frame length) | tag (16 bytes)]
//! ```
//!
//! - Key: 16-byte CEK from HKDF
//! - Nonce: 12-byte nonce from HKDF (single record, so no sequence XOR)
//! - No Additional Authenticated Data (AAD)

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes128Gcm, Nonce,
};

use super::error::CryptoError;
use super::key_derivation::{CEK_SIZE, NONCE_SIZE};

/// GCM authentication tag size
pub const TAG_SIZE: usize = 16;

/// Encrypt a plaintext frame
///
/// # Returns
///
/// Ciphertext with the 16-byte tag appended, `frame.len() + 16` bytes long
///
/// # Errors
///
/// `EncryptionFailed` only on an internal fault; callers must not retry.
pub fn encrypt_record(
    frame: &[u8],
    cek: &[u8; CEK_SIZE],
    nonce: &[u8; NONCE_SIZE],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes128Gcm::new_from_slice(cek).map_err(|e| CryptoError::EncryptionFailed {
        reason: format!("failed to create AES-128-GCM cipher: {}", e),
    })?;

    cipher
        .encrypt(
            &Nonce::from(*nonce),
            Payload {
                msg: frame,
                aad: b"",
            },
        )
        .map_err(|e| CryptoError::EncryptionFailed {
            reason: format!("AES-128-GCM seal failed: {}", e),
        })
}

/// Decrypt a record and verify its tag
///
/// # Errors
///
/// - `DecryptionFailed` if the record is shorter than a tag
/// - `DecryptionFailed` if authentication fails (wrong key, wrong nonce, tampered data)
pub fn decrypt_record(
    ciphertext: &[u8],
    cek: &[u8; CEK_SIZE],
    nonce: &[u8; NONCE_SIZE],
) -> Result<Vec<u8>, CryptoError> {
    if ciphertext.len() < TAG_SIZE {
        return Err(CryptoError::DecryptionFailed {
            reason: format!(
                "record too short: expected at least {} bytes for the tag, got {}",
                TAG_SIZE,
                ciphertext.len()
            ),
        });
    }

    let cipher = Aes128Gcm::new_from_slice(cek).map_err(|e| CryptoError::DecryptionFailed {
        reason: format!("failed to create AES-128-GCM cipher: {}", e),
    })?;

    cipher
        .decrypt(
            &Nonce::from(*nonce),
            Payload {
                msg: ciphertext,
                aad: b"",
            },
        )
        .map_err(|_| CryptoError::DecryptionFailed {
            reason: "authentication tag mismatch".to_string(),
        })
}
