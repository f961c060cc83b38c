// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Plaintext framing for the `aesgcm128` content encoding
//!
//! **Frame Format**:
//! ```text
//! [pad length (2 bytes, big-endian) | pad length zero bytes | payload]
//! ```
//!
//! The whole message is sent as a single record, so padding plus payload
//! must stay within [`MAX_RECORD_SIZE`].

use super::error::CryptoError;

/// Size of the big-endian padding length prefix
pub const PAD_LENGTH_PREFIX_SIZE: usize = 2;

/// Ceiling on padding length plus payload length
pub const MAX_RECORD_SIZE: usize = 4096;

/// Build a padded plaintext frame
///
/// # Errors
///
/// `PayloadTooLarge` if `pad_size + payload.len()` exceeds [`MAX_RECORD_SIZE`]
pub fn frame(payload: &[u8], pad_size: u16) -> Result<Vec<u8>, CryptoError> {
    let pad = usize::from(pad_size);
    let size = pad + payload.len();
    if size > MAX_RECORD_SIZE {
        return Err(CryptoError::PayloadTooLarge {
            size,
            max: MAX_RECORD_SIZE,
        });
    }

    let mut out = Vec::with_capacity(PAD_LENGTH_PREFIX_SIZE + size);
    out.extend_from_slice(&pad_size.to_be_bytes());
    out.resize(PAD_LENGTH_PREFIX_SIZE + pad, 0);
    out.extend_from_slice(payload);
    Ok(out)
}

/// Strip the padding from a decrypted frame and return the payload
///
/// Non-zero padding bytes are rejected.
pub fn unframe(frame: &[u8]) -> Result<&[u8], CryptoError> {
    let Some((prefix, rest)) = frame.split_first_chunk::<PAD_LENGTH_PREFIX_SIZE>() else {
        return Err(CryptoError::InvalidFrame {
            reason: format!("frame is {} bytes, shorter than the length prefix", frame.len()),
        });
    };

    let pad = usize::from(u16::from_be_bytes(*prefix));
    if pad > rest.len() {
        return Err(CryptoError::InvalidFrame {
            reason: format!("padding length {} exceeds remaining {} bytes", pad, rest.len()),
        });
    }

    let (padding, payload) = rest.split_at(pad);
    if padding.iter().any(|&b| b != 0) {
        return Err(CryptoError::InvalidFrame {
            reason: "padding contains non-zero bytes".to_string(),
        });
    }

    Ok(payload)
}

/// Largest payload that fits alongside `pad_size` bytes of padding
pub fn max_payload_len(pad_size: u16) -> usize {
    MAX_RECORD_SIZE.saturating_sub(usize::from(pad_size))
}
