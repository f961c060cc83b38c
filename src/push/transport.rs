// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP transport seam
//!
//! The client hands a finished [`PushRequest`] to a [`Transport`] and gets
//! back either a response (any status) or a failure meaning no response
//! arrived. Tests substitute their own implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::HeaderMap, Client};
use thiserror::Error;
use tracing::debug;

use super::headers::PushRequest;
use super::types::PushError;

/// An HTTP response, whatever its status
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

/// No HTTP response was obtained
#[derive(Debug, Clone, Error)]
#[error("{reason}")]
pub struct TransportFailure {
    /// Underlying cause
    pub reason: String,
    /// Whether the request timed out
    pub timed_out: bool,
}

impl TransportFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            timed_out: false,
        }
    }
}

/// Sends one request and returns the raw response
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a single POST
    ///
    /// Non-2xx statuses are still `Ok`; classification happens elsewhere.
    async fn send(&self, request: PushRequest) -> Result<TransportResponse, TransportFailure>;
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Transport without a request timeout
    pub fn new() -> Result<Self, PushError> {
        Self::build(None)
    }

    /// Transport that gives up after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self, PushError> {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Result<Self, PushError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PushError::configuration(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: PushRequest) -> Result<TransportResponse, TransportFailure> {
        let response = self
            .client
            .post(request.url)
            .headers(request.headers)
            .body(request.body)
            .send()
            .await
            .map_err(|e| TransportFailure {
                timed_out: e.is_timeout(),
                reason: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(|e| {
            debug!(status, error = %e, "Push service response body was interrupted");
            TransportFailure {
                timed_out: e.is_timeout(),
                reason: format!("failed to read response body: {}", e),
            }
        })?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
