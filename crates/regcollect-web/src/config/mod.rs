//! Configuration loading for regcollect.
//! Reads regcollect.toml from the current directory or the path in REGCOLLECT_CONFIG.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String { "127.0.0.1:3000".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url()     -> String { regcollect_client::ApiClient::DEFAULT_BASE_URL.to_string() }
fn default_timeout_secs() -> u64    { 30 }

impl Default for BackendConfig {
    fn default() -> Self {
        Self { base_url: default_base_url(), timeout_secs: default_timeout_secs() }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Set on deployments served over HTTPS.
    #[serde(default)]
    pub secure_cookie: bool,
}

fn default_cookie_name() -> String { "regcollect_token".to_string() }

impl Default for SessionConfig {
    fn default() -> Self {
        Self { cookie_name: default_cookie_name(), secure_cookie: false }
    }
}


impl Config {
    /// Load configuration from regcollect.toml.
    /// Checks REGCOLLECT_CONFIG env var first, then current directory.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("REGCOLLECT_CONFIG")
            .unwrap_or_else(|_| "regcollect.toml".to_string());

        if !Path::new(&path).exists() {
            anyhow::bail!(
                "Config file not found: {}\n\
                 Copy regcollect.example.toml to regcollect.toml and edit it.",
                path
            );
        }

        let content = std::fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.session.cookie_name.trim().is_empty() {
            anyhow::bail!("session.cookie_name must not be empty");
        }
        Ok(config)
    }

    /// REGCOLLECT_BIND and REGCOLLECT_API_URL win over the file.
    pub fn apply_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var("REGCOLLECT_BIND").ok(),
            std::env::var("REGCOLLECT_API_URL").ok(),
        )
    }

    pub fn with_overrides(mut self, bind: Option<String>, api_url: Option<String>) -> Self {
        if let Some(bind) = bind.filter(|b| !b.trim().is_empty()) {
            self.server.bind = bind;
        }
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.backend.base_url = url;
        }
        self
    }
}
