// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ECDH Key Agreement on P-256
//!
//! The application server generates a fresh ephemeral key pair for every
//! push message and agrees a shared secret with the subscriber's public key
//! (the `p256dh` value from the browser's push subscription). Both public
//! keys travel as uncompressed SEC1 points: `0x04 || X || Y`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use p256::{ecdh::EphemeralSecret, elliptic_curve::sec1::ToEncodedPoint, PublicKey, SecretKey};
use rand::rngs::OsRng;

use super::error::CryptoError;

/// Size of an uncompressed P-256 public key in bytes
pub const PUBLIC_KEY_SIZE: usize = 65;

/// Size of the raw ECDH shared secret in bytes
pub const SHARED_SECRET_SIZE: usize = 32;

const UNCOMPRESSED_POINT_TAG: u8 = 0x04;

/// A subscriber's P-256 public key, validated to be on the curve
#[derive(Clone, PartialEq, Eq)]
pub struct SubscriberPublicKey {
    key: PublicKey,
    bytes: [u8; PUBLIC_KEY_SIZE],
}

impl SubscriberPublicKey {
    /// Parse a raw uncompressed point (65 bytes)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != PUBLIC_KEY_SIZE {
            return Err(CryptoError::invalid_key(
                "subscriber_public_key",
                format!(
                    "expected {} bytes, got {}",
                    PUBLIC_KEY_SIZE,
                    bytes.len()
                ),
            ));
        }
        if bytes[0] != UNCOMPRESSED_POINT_TAG {
            return Err(CryptoError::invalid_key(
                "subscriber_public_key",
                format!("expected uncompressed point tag 0x04, got {:#04x}", bytes[0]),
            ));
        }

        let key = PublicKey::from_sec1_bytes(bytes).map_err(|_| {
            CryptoError::invalid_key("subscriber_public_key", "point is not on curve P-256")
        })?;

        let mut raw = [0u8; PUBLIC_KEY_SIZE];
        raw.copy_from_slice(bytes);
        Ok(Self { key, bytes: raw })
    }

    /// Parse the URL-safe base64 form browsers hand out as `keys.p256dh`.
    ///
    /// Trailing `=` padding is accepted and ignored.
    pub fn from_base64url(encoded: &str) -> Result<Self, CryptoError> {
        let raw = URL_SAFE_NO_PAD
            .decode(encoded.trim().trim_end_matches('='))
            .map_err(|e| {
                CryptoError::invalid_key(
                    "subscriber_public_key",
                    format!("base64url decode error: {}", e),
                )
            })?;
        Self::from_bytes(&raw)
    }

    /// Raw uncompressed point
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.bytes
    }

    pub(crate) fn public_key(&self) -> &PublicKey {
        &self.key
    }
}

impl std::fmt::Debug for SubscriberPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriberPublicKey")
            .field("point", &hex::encode(self.bytes))
            .finish()
    }
}

/// Application-server key pair for a single send.
///
/// Not `Clone`: the secret is consumed by [`EphemeralKeyPair::agree`], so a
/// key pair cannot be used for a second message.
pub struct EphemeralKeyPair {
    secret: EphemeralSecret,
    public: [u8; PUBLIC_KEY_SIZE],
}

impl EphemeralKeyPair {
    /// Generate a fresh key pair from the OS RNG
    pub fn generate() -> Self {
        let secret = EphemeralSecret::random(&mut OsRng);
        let public = encode_point(&secret.public_key());
        Self { secret, public }
    }

    /// Uncompressed public point, as sent in `Encryption-Key: dh=`
    pub fn public_key_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.public
    }

    /// Compute the ECDH shared secret with the subscriber and drop the private scalar
    pub fn agree(self, peer: &SubscriberPublicKey) -> SharedSecret {
        SharedSecret(self.secret.diffie_hellman(peer.public_key()))
    }
}

impl std::fmt::Debug for EphemeralKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EphemeralKeyPair")
            .field("public", &hex::encode(self.public))
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Raw ECDH output. Zeroized on drop by `p256`.
pub struct SharedSecret(p256::ecdh::SharedSecret);

impl SharedSecret {
    /// The 32-byte x-coordinate of the shared point
    pub fn as_bytes(&self) -> &[u8] {
        &self.0.raw_secret_bytes()[..]
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SharedSecret([REDACTED])")
    }
}

/// Receiver-side agreement: the subscriber's static secret with the sender's public key.
pub fn agree_with_secret(
    secret: &SecretKey,
    sender_public_key: &[u8],
) -> Result<SharedSecret, CryptoError> {
    let sender = PublicKey::from_sec1_bytes(sender_public_key).map_err(|_| {
        CryptoError::invalid_key("application_server_public_key", "point is not on curve P-256")
    })?;

    let shared = p256::ecdh::diffie_hellman(secret.to_nonzero_scalar(), sender.as_affine());
    Ok(SharedSecret(shared))
}

/// Encode a public key as an uncompressed SEC1 point
pub fn encode_point(key: &PublicKey) -> [u8; PUBLIC_KEY_SIZE] {
    let point = key.to_encoded_point(false);
    let mut out = [0u8; PUBLIC_KEY_SIZE];
    out.copy_from_slice(point.as_bytes());
    out
}
