//! Connection settings for the interaction endpoint.

use serde::Deserialize;
use std::time::Duration;

/// Client configuration with production defaults.
///
/// Delays are stored in milliseconds so the struct deserializes cleanly
/// from settings payloads; tests shrink them to keep scenarios fast.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Fully qualified URL of the turn endpoint.
    pub endpoint: String,
    /// Bearer credential supplied by the auth layer, if any.
    pub auth_token: Option<String>,
    /// Wait before the single silent retry after a gateway failure.
    pub gateway_retry_delay_ms: u64,
    /// Base of the multiplicative backoff used by explicit retries.
    pub retry_base_delay_ms: u64,
    /// Explicit retry attempts before giving up.
    pub max_retry_attempts: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            auth_token: None,
            gateway_retry_delay_ms: 5_000,
            retry_base_delay_ms: 1_000,
            max_retry_attempts: 3,
        }
    }
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn gateway_retry_delay(&self) -> Duration {
        Duration::from_millis(self.gateway_retry_delay_ms)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}
