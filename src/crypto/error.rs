// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Crypto Error Types
//!
//! Error types for the Web Push encryption engine, with enough context to
//! tell which key or which step failed without ever carrying key material.
//!
//! ## Error Variants
//!
//! - **InvalidKey**: Subscriber public key or auth secret is malformed or not on P-256
//! - **KeyDerivationFailed**: HKDF extract/expand rejected its inputs
//! - **EncryptionFailed**: AES-128-GCM refused to seal a frame (internal, never retryable)
//! - **DecryptionFailed**: Receiver-side tag verification failed
//! - **PayloadTooLarge**: Padding plus payload exceed the single-record ceiling
//! - **InvalidFrame**: Decrypted frame has a bad padding prefix
//!
//! ## Usage Example
//!
//! ```rust
//! use webpush_sender::crypto::CryptoError;
//!
//! let err = CryptoError::InvalidKey {
//!     key_type: "subscriber_public_key".to_string(),
//!     reason: "point is not on the curve".to_string(),
//! };
//! assert!(err.is_key_agreement());
//! ```

use std::fmt;

/// Error type for all Web Push cryptographic operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Invalid cryptographic key
    ///
    /// This error occurs when:
    /// - The key is not valid base64url
    /// - The key has the wrong length or is not an uncompressed point
    /// - The point is not on curve P-256
    InvalidKey {
        /// Type of key that failed (e.g., "subscriber_public_key", "auth_secret")
        key_type: String,
        /// Specific failure reason
        reason: String,
    },

    /// HKDF key derivation failed
    KeyDerivationFailed {
        /// Which derivation step failed
        operation: String,
        /// Specific failure reason
        reason: String,
    },

    /// AEAD encryption failed
    ///
    /// Indicates a derivation bug rather than bad input, so callers should
    /// treat it as fatal.
    EncryptionFailed {
        /// Specific failure reason
        reason: String,
    },

    /// AEAD decryption failed (wrong key, wrong salt, or tampered ciphertext)
    DecryptionFailed {
        /// Specific failure reason
        reason: String,
    },

    /// Padding plus payload do not fit in a single record
    PayloadTooLarge {
        /// Padding length plus payload length
        size: usize,
        /// Maximum allowed size
        max: usize,
    },

    /// Decrypted frame is malformed
    InvalidFrame {
        /// Specific failure reason
        reason: String,
    },
}

impl CryptoError {
    /// Whether this error came from parsing or agreeing on a peer key
    pub fn is_key_agreement(&self) -> bool {
        matches!(self, CryptoError::InvalidKey { .. })
    }

    pub(crate) fn invalid_key(key_type: &str, reason: impl Into<String>) -> Self {
        CryptoError::InvalidKey {
            key_type: key_type.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::InvalidKey { key_type, reason } => {
                write!(f, "Invalid key ({}): {}", key_type, reason)
            }
            CryptoError::KeyDerivationFailed { operation, reason } => {
                write!(f, "Key derivation failed during {}: {}", operation, reason)
            }
            CryptoError::EncryptionFailed { reason } => {
                write!(f, "Encryption failed: {}", reason)
            }
            CryptoError::DecryptionFailed { reason } => {
                write!(f, "Decryption failed: {}", reason)
            }
            CryptoError::PayloadTooLarge { size, max } => {
                write!(
                    f,
                    "Payload too large: {} bytes of padding and payload, maximum is {}",
                    size, max
                )
            }
            CryptoError::InvalidFrame { reason } => {
                write!(f, "Invalid plaintext frame: {}", reason)
            }
        }
    }
}

impl std::error::Error for CryptoError {}

// Conversion from p256 errors (elliptic curve operations)
impl From<p256::elliptic_curve::Error> for CryptoError {
    fn from(err: p256::elliptic_curve::Error) -> Self {
        CryptoError::invalid_key("subscriber_public_key", format!("p256 error: {}", err))
    }
}

// Conversion from base64 decode errors
impl From<base64::DecodeError> for CryptoError {
    fn from(err: base64::DecodeError) -> Self {
        CryptoError::invalid_key("base64url_field", format!("base64url decode error: {}", err))
    }
}
