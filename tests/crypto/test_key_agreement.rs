// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Subscriber key validation and ECDH agreement

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use p256::{elliptic_curve::sec1::ToEncodedPoint, SecretKey};
use rand::rngs::OsRng;
use webpush_sender::crypto::{
    ecdh::agree_with_secret, CryptoError, EphemeralKeyPair, SubscriberPublicKey, PUBLIC_KEY_SIZE,
};

#[test]
fn test_both_sides_agree() {
    let subscriber_secret = SecretKey::random(&mut OsRng);
    let point = subscriber_secret.public_key().to_encoded_point(false);
    let subscriber = SubscriberPublicKey::from_bytes(point.as_bytes()).unwrap();

    let key_pair = EphemeralKeyPair::generate();
    let server_public = *key_pair.public_key_bytes();
    let sender_side = key_pair.agree(&subscriber);

    let receiver_side = agree_with_secret(&subscriber_secret, &server_public).unwrap();
    assert_eq!(sender_side.as_bytes(), receiver_side.as_bytes());
    assert_eq!(sender_side.as_bytes().len(), 32);
}

#[test]
fn test_browser_encoded_key_accepted() {
    let secret = SecretKey::random(&mut OsRng);
    let point = secret.public_key().to_encoded_point(false);

    let unpadded = URL_SAFE_NO_PAD.encode(point.as_bytes());
    let padded = format!("{}=", unpadded);

    for encoded in [unpadded, padded] {
        let key = SubscriberPublicKey::from_base64url(&encoded).unwrap();
        assert_eq!(key.as_bytes().as_slice(), point.as_bytes());
    }
}

#[test]
fn test_compressed_key_rejected() {
    let secret = SecretKey::random(&mut OsRng);
    let compressed = secret.public_key().to_encoded_point(true);
    let result = SubscriberPublicKey::from_bytes(compressed.as_bytes());
    assert!(matches!(result, Err(CryptoError::InvalidKey { .. })));
}

#[test]
fn test_off_curve_point_rejected() {
    let mut bytes = [0u8; PUBLIC_KEY_SIZE];
    bytes[0] = 0x04;
    bytes[PUBLIC_KEY_SIZE - 1] = 0x01;
    let err = SubscriberPublicKey::from_bytes(&bytes).unwrap_err();
    assert!(err.is_key_agreement());
}

#[test]
fn test_garbage_base64_rejected() {
    let err = SubscriberPublicKey::from_base64url("not*base64!").unwrap_err();
    assert!(err.is_key_agreement());
}

#[test]
fn test_ephemeral_keys_differ() {
    let a = EphemeralKeyPair::generate();
    let b = EphemeralKeyPair::generate();
    assert_ne!(a.public_key_bytes(), b.public_key_bytes());
    assert_eq!(a.public_key_bytes()[0], 0x04);
}
