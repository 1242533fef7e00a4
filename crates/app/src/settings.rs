//! Application configuration.
//!
//! Settings come from an optional `settings.toml` merged with `FINANCE__*`
//! environment variables (`FINANCE__SERVER__PORT=8080`,
//! `FINANCE__SERVER__PROVIDER_PUBLIC_KEY=...`). The database and the
//! identity-provider public key have no defaults: loading fails when they
//! are absent, so a misconfigured deployment dies at startup.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

fn default_level() -> String {
    "info".to_string()
}

fn default_port() -> u16 {
    3000
}

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    /// `"memory"` or a path to the SQLite file.
    pub database: String,
    /// PEM-encoded RSA public key of the identity provider.
    pub provider_public_key: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings").required(false))
            .add_source(Environment::with_prefix("FINANCE").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

impl Server {
    pub fn database_url(&self) -> String {
        if self.database == "memory" {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite:{}?mode=rwc", self.database)
        }
    }
}
