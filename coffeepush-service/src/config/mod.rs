use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

pub const DEFAULT_PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";

#[derive(Debug, Clone, Deserialize)]
pub struct CoffeepushConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub pushover: PushoverConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PushoverConfig {
    /// Application token issued by Pushover. Every relayed message is sent
    /// on behalf of this application.
    pub api_token: Secret<String>,
    pub api_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    /// OTLP collector endpoint. Span export is off when unset.
    pub otlp_endpoint: Option<String>,
}

impl CoffeepushConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        Ok(CoffeepushConfig {
            common: common_config,
            pushover: PushoverConfig {
                api_token: Secret::new(get_env("PUSHOVER_API_TOKEN", None)?),
                api_url: get_env("PUSHOVER_API_URL", Some(DEFAULT_PUSHOVER_API_URL))?,
            },
            observability: ObservabilityConfig {
                otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
            },
        })
    }
}

/// Empty values count as unset.
fn get_env(key: &str, default: Option<&str>) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => match default {
            Some(def) => Ok(def.to_string()),
            None => Err(AppError::ConfigError(anyhow::anyhow!("Missing {}", key))),
        },
    }
}
