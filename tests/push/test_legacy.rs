// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Legacy GCM transport

use std::sync::Arc;

use async_trait::async_trait;
use mockall::mock;
use reqwest::header::{HeaderMap, AUTHORIZATION};
use webpush_sender::push::{
    LegacyKeyStore, Payload, PushError, PushMessage, PushRequest, Transport, TransportFailure,
    TransportResponse, WebPushClient, WebPushConfig,
};

use super::common::{FakePushService, Subscriber};

mock! {
    pub PushTransport {}

    #[async_trait]
    impl Transport for PushTransport {
        async fn send(&self, request: PushRequest) -> Result<TransportResponse, TransportFailure>;
    }
}

const LEGACY_ENDPOINT: &str = "https://android.googleapis.com/gcm/send/someSubscriptionID";

fn mocked_client(mock: MockPushTransport) -> WebPushClient {
    let config = WebPushConfig::default().with_legacy_api_key("my_gcm_key");
    WebPushClient::with_transport(&config, Arc::new(mock)).unwrap()
}

#[tokio::test]
async fn test_legacy_request_on_the_wire() {
    let service = FakePushService::start(200, "{\"success\":1}").await;
    let config = WebPushConfig::default()
        .with_legacy_api_key("my_gcm_key")
        .with_legacy_endpoint_prefix(service.url("/gcm/send"));
    let client = WebPushClient::new(&config).unwrap();

    let body = client
        .send_notification(
            &service.url("/gcm/send/someSubscriptionID"),
            None,
            None,
            None,
        )
        .await
        .unwrap();
    assert_eq!(body, "{\"success\":1}");

    let request = service.single_request();
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/gcm/send");
    assert_eq!(
        request.body,
        br#"{"registration_ids":["someSubscriptionID"]}"#.to_vec()
    );
    assert_eq!(request.body.len(), 43);
    assert_eq!(request.header("content-length"), Some("43"));
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.header("authorization"), Some("key=my_gcm_key"));
    assert!(request.header("encryption").is_none());
}

#[tokio::test]
async fn test_legacy_default_prefix_targets_relay() {
    let mut mock = MockPushTransport::new();
    mock.expect_send()
        .withf(|request: &PushRequest| {
            request.url.as_str() == "https://android.googleapis.com/gcm/send"
                && request.headers[AUTHORIZATION] == "key=my_gcm_key"
                && request.body == br#"{"registration_ids":["someSubscriptionID"]}"#
        })
        .times(1)
        .returning(|_| {
            Ok(TransportResponse {
                status: 200,
                headers: HeaderMap::new(),
                body: "accepted".to_string(),
            })
        });

    let body = mocked_client(mock)
        .send(&PushMessage::new(LEGACY_ENDPOINT))
        .await
        .unwrap();
    assert_eq!(body, "accepted");
}

#[tokio::test]
async fn test_legacy_payload_never_reaches_transport() {
    let mut mock = MockPushTransport::new();
    mock.expect_send().times(0);

    let subscriber = Subscriber::generate();
    let err = mocked_client(mock)
        .send_notification(
            LEGACY_ENDPOINT,
            None,
            Some(subscriber.p256dh.as_str()),
            Some(Payload::from("hello")),
        )
        .await
        .unwrap_err();

    match err {
        PushError::Configuration { reason } => {
            assert_eq!(reason, "payload unsupported on legacy transport")
        }
        other => panic!("expected configuration error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_legacy_rejection_is_web_push_error() {
    let mut mock = MockPushTransport::new();
    mock.expect_send().times(1).returning(|_| {
        Ok(TransportResponse {
            status: 401,
            headers: HeaderMap::new(),
            body: "Unauthorized".to_string(),
        })
    });

    let err = mocked_client(mock)
        .send(&PushMessage::new(LEGACY_ENDPOINT))
        .await
        .unwrap_err();
    let rejection = err.as_web_push_error().expect("WebPushError");
    assert_eq!(rejection.status_code, 401);
    assert_eq!(rejection.body, "Unauthorized");
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_shared_key_store_updates_between_sends() {
    let store = LegacyKeyStore::with_key("old_key");

    let mut mock = MockPushTransport::new();
    let mut sequence = mockall::Sequence::new();
    for expected in ["key=old_key", "key=new_key"] {
        mock.expect_send()
            .withf(move |request: &PushRequest| request.headers[AUTHORIZATION] == expected)
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| {
                Ok(TransportResponse {
                    status: 200,
                    headers: HeaderMap::new(),
                    body: String::new(),
                })
            });
    }

    let client = WebPushClient::with_transport(&WebPushConfig::default(), Arc::new(mock))
        .unwrap()
        .with_key_store(store.clone());

    client.send(&PushMessage::new(LEGACY_ENDPOINT)).await.unwrap();
    store.set("new_key");
    client.send(&PushMessage::new(LEGACY_ENDPOINT)).await.unwrap();
}

#[tokio::test]
async fn test_missing_key_fails_before_transport() {
    let mut mock = MockPushTransport::new();
    mock.expect_send().times(0);

    let client =
        WebPushClient::with_transport(&WebPushConfig::default(), Arc::new(mock)).unwrap();
    let err = client
        .send(&PushMessage::new(LEGACY_ENDPOINT))
        .await
        .unwrap_err();
    assert!(matches!(err, PushError::Configuration { .. }));
}

#[tokio::test]
async fn test_transport_failure_maps_to_transport_error() {
    let mut mock = MockPushTransport::new();
    mock.expect_send().times(1).returning(|_| {
        Err(TransportFailure {
            reason: "timed out".to_string(),
            timed_out: true,
        })
    });

    let err = mocked_client(mock)
        .send(&PushMessage::new(LEGACY_ENDPOINT))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PushError::Transport { timed_out: true, .. }
    ));
}
