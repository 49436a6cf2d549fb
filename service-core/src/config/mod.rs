use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Config {
    /// Load the shared settings.
    ///
    /// Sources, lowest precedence first: `configuration.*` file, `APP__*`
    /// variables, then the bare `PORT` variable set by most hosting platforms.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let port = env::var("PORT").ok().filter(|p| !p.is_empty());

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .set_override_option("port", port)?
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
