// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Sender/receiver round trips through the public API

use p256::{elliptic_curve::sec1::ToEncodedPoint, SecretKey};
use rand::{rngs::OsRng, RngCore};
use webpush_sender::crypto::{
    decrypt_payload, encrypt_payload, CryptoError, SubscriberPublicKey, MAX_RECORD_SIZE, TAG_SIZE,
};

fn subscriber() -> (SecretKey, SubscriberPublicKey) {
    let secret = SecretKey::random(&mut OsRng);
    let point = secret.public_key().to_encoded_point(false);
    let public = SubscriberPublicKey::from_bytes(point.as_bytes()).unwrap();
    (secret, public)
}

fn roundtrip(payload: &[u8], pad_size: u16) -> Vec<u8> {
    let (secret, public) = subscriber();
    let encrypted = encrypt_payload(&public, payload, pad_size, None).unwrap();
    assert_eq!(
        encrypted.ciphertext.len(),
        2 + usize::from(pad_size) + payload.len() + TAG_SIZE
    );
    decrypt_payload(
        &secret,
        &encrypted.server_public_key,
        &encrypted.salt,
        &encrypted.ciphertext,
        None,
    )
    .unwrap()
}

#[test]
fn test_roundtrip_lengths() {
    for len in [0usize, 1, 15, 16, 17, 255, 1024, MAX_RECORD_SIZE] {
        let mut payload = vec![0u8; len];
        OsRng.fill_bytes(&mut payload);
        assert_eq!(roundtrip(&payload, 0), payload, "length {}", len);
    }
}

#[test]
fn test_roundtrip_with_padding() {
    assert_eq!(roundtrip(b"padded message", 100), b"padded message");
    assert_eq!(roundtrip(b"", 4096), b"");
}

#[test]
fn test_roundtrip_unicode() {
    let text = "Grüße 😁 通知";
    assert_eq!(roundtrip(text.as_bytes(), 0), text.as_bytes());
}

#[test]
fn test_fresh_material_per_message() {
    let (_, public) = subscriber();
    let first = encrypt_payload(&public, b"same payload", 0, None).unwrap();
    let second = encrypt_payload(&public, b"same payload", 0, None).unwrap();

    assert_ne!(first.salt, second.salt);
    assert_ne!(first.server_public_key, second.server_public_key);
    assert_ne!(first.ciphertext, second.ciphertext);
}

#[test]
fn test_other_subscriber_cannot_decrypt() {
    let (_, public) = subscriber();
    let (other_secret, _) = subscriber();
    let encrypted = encrypt_payload(&public, b"private", 0, None).unwrap();

    let result = decrypt_payload(
        &other_secret,
        &encrypted.server_public_key,
        &encrypted.salt,
        &encrypted.ciphertext,
        None,
    );
    assert!(matches!(result, Err(CryptoError::DecryptionFailed { .. })));
}

#[test]
fn test_record_ceiling() {
    let (_, public) = subscriber();
    let at_limit = vec![1u8; MAX_RECORD_SIZE - 8];
    assert!(encrypt_payload(&public, &at_limit, 8, None).is_ok());

    let over = encrypt_payload(&public, &at_limit, 9, None);
    assert!(matches!(over, Err(CryptoError::PayloadTooLarge { .. })));
}
