#![allow(dead_code)]

use coffeepush_service::config::{CoffeepushConfig, ObservabilityConfig, PushoverConfig};
use coffeepush_service::services::{MockPushProvider, PushProvider};
use coffeepush_service::startup::Application;
use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub const TEST_APP_TOKEN: &str = "azGDORePK8gMaC0QOYAMyEEuzJnyUi";
pub const TEST_USER_KEY: &str = "uQiRzpo4DXghDmr9QzzfQu27cmVRsG";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub provider: Arc<MockPushProvider>,
}

pub fn test_config(api_url: &str) -> CoffeepushConfig {
    CoffeepushConfig {
        // Random port for testing
        common: CoreConfig { port: 0 },
        pushover: PushoverConfig {
            api_token: Secret::new(TEST_APP_TOKEN.to_string()),
            api_url: api_url.to_string(),
        },
        observability: ObservabilityConfig {
            otlp_endpoint: None,
        },
    }
}

impl TestApp {
    /// Spawn the service backed by a recording mock provider.
    pub async fn spawn() -> Self {
        Self::spawn_with(MockPushProvider::new()).await
    }

    /// Spawn the service with a provider that fails every delivery.
    pub async fn spawn_failing() -> Self {
        Self::spawn_with(MockPushProvider::failing()).await
    }

    async fn spawn_with(provider: MockPushProvider) -> Self {
        let provider = Arc::new(provider);
        let dyn_provider: Arc<dyn PushProvider> = provider.clone();

        let app = Application::build_with_provider(test_config("http://unused.invalid"), dyn_provider)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = spawn_app(app, port).await;

        TestApp {
            address,
            port,
            provider,
        }
    }
}

/// Run `app` in the background and wait until it answers health checks.
pub async fn spawn_app(app: Application, port: u16) -> String {
    tokio::spawn(async move {
        app.run_until_stopped().await.ok();
    });

    let address = format!("http://127.0.0.1:{}", port);
    let client = reqwest::Client::new();
    let health_url = format!("{}/health", address);
    for _ in 0..50 {
        if client.get(&health_url).send().await.is_ok() {
            break;
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
    }

    address
}
