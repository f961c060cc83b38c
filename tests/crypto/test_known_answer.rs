// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fixed vectors produced by an independent aesgcm128 implementation

use p256::SecretKey;
use webpush_sender::crypto::{decrypt_payload, ecdh::encode_point};
use webpush_sender::push::{parse_encryption_header, parse_encryption_key_header};

const SUBSCRIBER_SECRET: &str = "0102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f20";
const SUBSCRIBER_PUBLIC: &str = "04515c3d6eb9e396b904d3feca7f54fdcd0cc1e997bf375dca515ad0a6c3b4035f\
                                 4536be3a50f318fbf9a5475902a221502bef0d57e08c53b2cc0a56f17d9f9354";
const SERVER_PUBLIC: &str = "041f140146bfb1b251f84f4ddbe0d4cdcfd77afd984a9520e35794021f8312bb9e\
                             ec995a08b1fa7704df3dcc0b50a9665263fb7711f95f9f8a449c5096e47c892b";
const SALT: &str = "6465666768696a6b6c6d6e6f70717273";

/// "Hello, push!" with 4 bytes of padding, no auth secret
const CIPHERTEXT: &str = "ca5692e3c627ebee5dfae11250df3550468c4fdb4dde8c925a397abdd1a3f22d779c";

/// "authenticated" with no padding and auth secret 0xAA * 16
const CIPHERTEXT_WITH_AUTH: &str = "e57eb509a6dc4418da842efb07bae043a14eb51d1255245bad9bbd977fe602";

const ENCRYPTION_HEADER: &str = "keyid=p256dh;salt=ZGVmZ2hpamtsbW5vcHFycw";
const ENCRYPTION_KEY_HEADER: &str = "keyid=p256dh;dh=BB8UAUa_sbJR-E9N2-DUzc_Xev2YSpUg41eUAh-DErue7\
                                     JlaCLH6dwTfPcwLUKlmUmP7dxH5X5-KRJxQluR8iSs";

fn subscriber_secret() -> SecretKey {
    SecretKey::from_slice(&hex::decode(SUBSCRIBER_SECRET).unwrap()).unwrap()
}

#[test]
fn test_subscriber_public_key_matches_vector() {
    let public = encode_point(&subscriber_secret().public_key());
    assert_eq!(hex::encode(public), SUBSCRIBER_PUBLIC);
}

#[test]
fn test_decrypt_known_ciphertext() {
    let plaintext = decrypt_payload(
        &subscriber_secret(),
        &hex::decode(SERVER_PUBLIC).unwrap(),
        &hex::decode(SALT).unwrap(),
        &hex::decode(CIPHERTEXT).unwrap(),
        None,
    )
    .unwrap();
    assert_eq!(plaintext, b"Hello, push!");
}

#[test]
fn test_decrypt_known_ciphertext_with_auth_secret() {
    let auth = [0xAAu8; 16];
    let plaintext = decrypt_payload(
        &subscriber_secret(),
        &hex::decode(SERVER_PUBLIC).unwrap(),
        &hex::decode(SALT).unwrap(),
        &hex::decode(CIPHERTEXT_WITH_AUTH).unwrap(),
        Some(auth.as_slice()),
    )
    .unwrap();
    assert_eq!(plaintext, b"authenticated");
}

#[test]
fn test_known_header_values_decode() {
    assert_eq!(
        hex::encode(parse_encryption_header(ENCRYPTION_HEADER).unwrap()),
        SALT
    );
    assert_eq!(
        hex::encode(parse_encryption_key_header(ENCRYPTION_KEY_HEADER).unwrap()),
        SERVER_PUBLIC
    );
}

#[test]
fn test_wrong_salt_fails_authentication() {
    let mut salt = hex::decode(SALT).unwrap();
    salt[0] ^= 1;
    let result = decrypt_payload(
        &subscriber_secret(),
        &hex::decode(SERVER_PUBLIC).unwrap(),
        &salt,
        &hex::decode(CIPHERTEXT).unwrap(),
        None,
    );
    assert!(result.is_err());
}
