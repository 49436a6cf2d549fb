use super::{ProviderError, ProviderResponse, PushMessage, PushProvider};
use crate::config::PushoverConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Pushover application tokens and user/group keys are 30 alphanumerics.
const PUSHOVER_KEY_LEN: usize = 30;
const PUSHOVER_MESSAGE_MAX_CHARS: usize = 1024;
const APP_REMAINING_HEADER: &str = "x-limit-app-remaining";

pub struct PushoverProvider {
    config: PushoverConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct PushoverRequest<'a> {
    token: &'a str,
    user: &'a str,
    message: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct PushoverResponse {
    #[serde(default)]
    status: i64,
    #[serde(default)]
    request: Option<String>,
    #[serde(default)]
    errors: Vec<String>,
}

fn is_pushover_key(value: &str) -> bool {
    value.len() == PUSHOVER_KEY_LEN && value.chars().all(|c| c.is_ascii_alphanumeric())
}

impl PushoverProvider {
    pub fn new(config: PushoverConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: PushoverConfig, client: Client) -> Self {
        Self { config, client }
    }

    fn validate(&self, push: &PushMessage) -> Result<(), ProviderError> {
        if !is_pushover_key(self.config.api_token.expose_secret()) {
            return Err(ProviderError::Configuration(
                "Pushover application token is malformed".to_string(),
            ));
        }

        if !is_pushover_key(&push.recipient) {
            return Err(ProviderError::InvalidRecipient(
                "Pushover recipient key must be 30 alphanumeric characters".to_string(),
            ));
        }

        if push.message.is_empty() {
            return Err(ProviderError::InvalidMessage("message is empty".to_string()));
        }

        let length = push.message.chars().count();
        if length > PUSHOVER_MESSAGE_MAX_CHARS {
            return Err(ProviderError::InvalidMessage(format!(
                "message is {} characters, limit is {}",
                length, PUSHOVER_MESSAGE_MAX_CHARS
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl PushProvider for PushoverProvider {
    async fn send(&self, push: &PushMessage) -> Result<ProviderResponse, ProviderError> {
        self.validate(push)?;

        let request = PushoverRequest {
            token: self.config.api_token.expose_secret(),
            user: &push.recipient,
            message: &push.message,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .form(&request)
            .send()
            .await
            .map_err(|e| {
                ProviderError::Connection(format!("Failed to connect to Pushover: {}", e))
            })?;

        let status = response.status();

        if let Some(remaining) = response
            .headers()
            .get(APP_REMAINING_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            tracing::debug!(remaining = %remaining, "Pushover application quota");
        }

        let body = response.text().await.unwrap_or_default();
        let parsed: Option<PushoverResponse> = serde_json::from_str(&body).ok();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited(
                "Pushover message quota exhausted".to_string(),
            ));
        }

        if !status.is_success() {
            let detail = match parsed {
                Some(p) if !p.errors.is_empty() => p.errors.join("; "),
                _ => body,
            };
            return Err(ProviderError::SendFailed(format!(
                "Pushover API returned error status {}: {}",
                status, detail
            )));
        }

        let pushover_response = parsed.ok_or_else(|| {
            ProviderError::SendFailed("Failed to parse Pushover response".to_string())
        })?;

        if pushover_response.status != 1 {
            return Err(ProviderError::SendFailed(format!(
                "Pushover rejected message: {}",
                pushover_response.errors.join("; ")
            )));
        }

        tracing::info!(
            request_id = ?pushover_response.request,
            "Push notification sent successfully via Pushover"
        );

        Ok(ProviderResponse::success(pushover_response.request))
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if !is_pushover_key(self.config.api_token.expose_secret()) {
            return Err(ProviderError::Configuration(
                "Pushover application token is malformed".to_string(),
            ));
        }

        if self.config.api_url.is_empty() {
            return Err(ProviderError::Configuration(
                "Pushover API URL is not configured".to_string(),
            ));
        }

        Ok(())
    }
}

/// Mock push provider for testing. Records every message it is handed.
pub struct MockPushProvider {
    succeed: bool,
    send_count: AtomicU64,
    sent: Mutex<Vec<PushMessage>>,
}

impl MockPushProvider {
    pub fn new() -> Self {
        Self {
            succeed: true,
            send_count: AtomicU64::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// A provider whose every delivery fails as if the service rejected it.
    pub fn failing() -> Self {
        Self {
            succeed: false,
            ..Self::new()
        }
    }

    pub fn send_count(&self) -> u64 {
        self.send_count.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<PushMessage> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

impl Default for MockPushProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PushProvider for MockPushProvider {
    async fn send(&self, push: &PushMessage) -> Result<ProviderResponse, ProviderError> {
        self.send_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(push.clone());
        }

        if !self.succeed {
            return Err(ProviderError::SendFailed(
                "[MOCK] push delivery rejected".to_string(),
            ));
        }

        tracing::info!(
            message_length = %push.message.len(),
            "[MOCK] Push notification would be sent"
        );

        Ok(ProviderResponse::success(Some(format!(
            "mock-push-{}",
            self.send_count.load(Ordering::SeqCst)
        ))))
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
