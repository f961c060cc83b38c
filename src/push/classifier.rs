// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Response classification

use super::transport::TransportResponse;
use super::types::{PushOutcome, WebPushError};

/// Map a push service response to an outcome
///
/// Any 2xx resolves with the body. Everything else is a rejection that
/// carries the status, headers and body verbatim.
pub fn classify(endpoint: &str, response: TransportResponse) -> PushOutcome {
    if (200..300).contains(&response.status) {
        PushOutcome::Resolved(response.body)
    } else {
        PushOutcome::Rejected(WebPushError::new(
            endpoint,
            response.status,
            response.headers,
            response.body,
        ))
    }
}
