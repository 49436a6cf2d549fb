pub mod pushover;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use pushover::{MockPushProvider, PushoverProvider};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Send error: {0}")]
    SendFailed(String),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),
}

impl ProviderError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Configuration(_) => "configuration",
            ProviderError::Connection(_) => "connection",
            ProviderError::SendFailed(_) => "send_failed",
            ProviderError::InvalidRecipient(_) => "invalid_recipient",
            ProviderError::InvalidMessage(_) => "invalid_message",
            ProviderError::RateLimited(_) => "rate_limited",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub provider_id: Option<String>,
}

impl ProviderResponse {
    pub fn success(provider_id: Option<String>) -> Self {
        Self { provider_id }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    /// Opaque destination identifier, e.g. a Pushover user or group key.
    pub recipient: String,
    pub message: String,
}

#[async_trait]
pub trait PushProvider: Send + Sync {
    async fn send(&self, push: &PushMessage) -> Result<ProviderResponse, ProviderError>;
    /// Configuration sanity check. Never touches the network.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
