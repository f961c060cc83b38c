// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Endpoint routing between the standard and legacy transports

use url::Url;

use super::types::PushError;

/// Where a message goes and how it is addressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Standard Web Push: POST to the endpoint itself
    Standard {
        /// Parsed subscription endpoint
        endpoint: Url,
    },
    /// Legacy GCM: POST to the relay with the registration id in the body
    Legacy {
        /// The legacy prefix URL
        relay: Url,
        /// Trailing path segment of the endpoint
        registration_id: String,
    },
}

impl Route {
    /// URL the request is sent to
    pub fn target(&self) -> &Url {
        match self {
            Route::Standard { endpoint } => endpoint,
            Route::Legacy { relay, .. } => relay,
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Route::Legacy { .. })
    }
}

/// Decides the transport for an endpoint
///
/// An endpoint is legacy when it has the prefix's scheme, host and port, and
/// its path is the prefix path followed by `/` and the registration id.
#[derive(Debug, Clone)]
pub struct EndpointRouter {
    prefix: Url,
    prefix_path: String,
}

impl EndpointRouter {
    /// Create a router for `prefix`
    pub fn new(prefix: &str) -> Result<Self, PushError> {
        let parsed = Url::parse(prefix).map_err(|e| {
            PushError::configuration(format!("invalid legacy endpoint prefix: {}", e))
        })?;
        if parsed.cannot_be_a_base() {
            return Err(PushError::configuration(
                "legacy endpoint prefix must be a hierarchical URL",
            ));
        }
        let prefix_path = parsed.path().trim_end_matches('/').to_string();
        Ok(Self {
            prefix: parsed,
            prefix_path,
        })
    }

    /// The legacy relay URL
    pub fn prefix(&self) -> &Url {
        &self.prefix
    }

    fn same_origin(&self, endpoint: &Url) -> bool {
        endpoint.scheme() == self.prefix.scheme()
            && endpoint.host_str() == self.prefix.host_str()
            && endpoint.port_or_known_default() == self.prefix.port_or_known_default()
    }

    /// Path remainder for an endpoint under the prefix, `None` if not legacy
    fn remainder<'a>(&self, endpoint: &'a Url) -> Option<&'a str> {
        if !self.same_origin(endpoint) {
            return None;
        }
        let rest = endpoint.path().strip_prefix(self.prefix_path.as_str())?;
        if rest.is_empty() {
            return Some("");
        }
        rest.strip_prefix('/')
    }

    /// Whether `endpoint` selects the legacy transport
    pub fn is_legacy(&self, endpoint: &Url) -> bool {
        self.remainder(endpoint).is_some()
    }

    /// Parse and route an endpoint
    ///
    /// # Errors
    ///
    /// `InvalidEndpoint` if the URL does not parse, is not http(s), or is a
    /// legacy endpoint without a registration id.
    pub fn route(&self, endpoint: &str) -> Result<Route, PushError> {
        let parsed = Url::parse(endpoint).map_err(|e| PushError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PushError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let Some(rest) = self.remainder(&parsed) else {
            return Ok(Route::Standard { endpoint: parsed });
        };
        // The registration id is the trailing path segment
        match rest.rsplit('/').next() {
            Some(registration_id) if !registration_id.is_empty() => Ok(Route::Legacy {
                relay: self.prefix.clone(),
                registration_id: registration_id.to_string(),
            }),
            _ => Err(PushError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: "legacy endpoint has no registration id".to_string(),
            }),
        }
    }
}
