//! # Configuration
//!
//! Settings are read from an optional JSON file and then overridden by
//! environment variables:
//!
//! - `ONYX_BASE_URL`, `ONYX_DATABASE_ID`, `ONYX_API_KEY`, `ONYX_API_SECRET`
//! - `ONYX_PARTITION`, `ONYX_TTL`
//! - `ONYX_REQUEST_LOGGING_ENABLED`, `ONYX_RESPONSE_LOGGING_ENABLED`
//! - `ONYX_REQUEST_TIMEOUT_MS`, `ONYX_CONNECT_TIMEOUT_MS`
//! - `SERVER_HOST`, `SERVER_PORT`, `CUSTOMER_STORE` (`onyx` | `memory`)
//!
//! [`AppConfig::validate`] must pass before any client is built.

pub mod errors;
pub mod onyx;

pub use errors::{ConfigError, ConfigResult};
pub use onyx::OnyxConfig;

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::http_server::HttpServerConfig;

/// Which store implementation backs the service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Onyx Cloud over HTTPS
    #[default]
    Onyx,
    /// Process-local store, nothing survives a restart
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "onyx" => Ok(Self::Onyx),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

/// Complete process configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: HttpServerConfig,

    #[serde(default)]
    pub onyx: OnyxConfig,

    #[serde(default)]
    pub store: StoreBackend,
}

fn parse_env<T: FromStr>(name: &'static str, value: String) -> ConfigResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { name, value })
}

impl AppConfig {
    /// Read a JSON config file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// File (when given) plus process environment, validated
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override settings from an environment lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let onyx = &mut self.onyx;
        if let Some(v) = lookup("ONYX_BASE_URL") {
            onyx.base_url = v;
        }
        if let Some(v) = lookup("ONYX_DATABASE_ID") {
            onyx.database_id = v;
        }
        if let Some(v) = lookup("ONYX_API_KEY") {
            onyx.api_key = v;
        }
        if let Some(v) = lookup("ONYX_API_SECRET") {
            onyx.api_secret = v;
        }
        if let Some(v) = lookup("ONYX_PARTITION") {
            onyx.partition = Some(v);
        }
        if let Some(v) = lookup("ONYX_REQUEST_LOGGING_ENABLED") {
            onyx.request_logging_enabled = Some(parse_env("ONYX_REQUEST_LOGGING_ENABLED", v)?);
        }
        if let Some(v) = lookup("ONYX_RESPONSE_LOGGING_ENABLED") {
            onyx.response_logging_enabled = Some(parse_env("ONYX_RESPONSE_LOGGING_ENABLED", v)?);
        }
        if let Some(v) = lookup("ONYX_TTL") {
            onyx.ttl = Some(parse_env("ONYX_TTL", v)?);
        }
        if let Some(v) = lookup("ONYX_REQUEST_TIMEOUT_MS") {
            onyx.request_timeout_ms = Some(parse_env("ONYX_REQUEST_TIMEOUT_MS", v)?);
        }
        if let Some(v) = lookup("ONYX_CONNECT_TIMEOUT_MS") {
            onyx.connect_timeout_ms = Some(parse_env("ONYX_CONNECT_TIMEOUT_MS", v)?);
        }

        if let Some(v) = lookup("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("SERVER_PORT") {
            self.server.port = parse_env("SERVER_PORT", v)?;
        }
        if let Some(v) = lookup("CUSTOMER_STORE") {
            self.store = parse_env("CUSTOMER_STORE", v)?;
        }
        Ok(())
    }

    /// Fail fast on missing credentials; the memory store needs none
    pub fn validate(&self) -> ConfigResult<()> {
        match self.store {
            StoreBackend::Onyx => self.onyx.validate(),
            StoreBackend::Memory => Ok(()),
        }
    }
}
