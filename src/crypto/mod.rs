// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Web Push Message Encryption
//!
//! This module implements the `aesgcm128` content encoding used to encrypt
//! push payloads for a browser subscription:
//!
//! - **ECDH**: Ephemeral-static key agreement on P-256
//! - **Key Derivation**: HKDF-SHA256 with the `Content-Encoding` info strings
//! - **Framing**: 2-byte padding length, zero padding, payload
//! - **AES-GCM**: AES-128-GCM sealing of the frame, no AAD
//!
//! ## Security Considerations
//!
//! - Ephemeral key pairs and salts are generated per message and never reused
//! - Shared secrets, CEKs and nonces live only for the duration of one call
//!   and are zeroized on drop
//! - None of the secret values are logged
//!
//! ## Protocol Flow
//!
//! 1. Application server generates an ephemeral P-256 key pair and a 16-byte salt
//! 2. ECDH with the subscriber's `p256dh` key gives the shared secret
//! 3. HKDF-Extract(salt, secret) then two HKDF-Expand calls give CEK and nonce
//! 4. The payload is framed with padding and sealed with AES-128-GCM
//! 5. Salt and ephemeral public key travel in the `Encryption` and
//!    `Encryption-Key` headers; the subscriber repeats steps 2-3 to decrypt

pub mod aes_gcm;
pub mod ecdh;
pub mod encryption;
pub mod error;
pub mod framing;
pub mod key_derivation;

pub use aes_gcm::{decrypt_record, encrypt_record, TAG_SIZE};
pub use ecdh::{EphemeralKeyPair, SharedSecret, SubscriberPublicKey, PUBLIC_KEY_SIZE};
pub use encryption::{decrypt_payload, encrypt_payload, EncryptedPayload};
pub use error::CryptoError;
pub use framing::{frame, unframe, MAX_RECORD_SIZE};
pub use key_derivation::{derive_content_keys, ContentKeys, AUTH_SECRET_SIZE, SALT_SIZE};
