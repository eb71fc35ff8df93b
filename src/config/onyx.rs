//! Onyx Cloud connection settings

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::{ConfigError, ConfigResult};

/// Connection settings for the Onyx Cloud database
///
/// `base_url`, `database_id`, `api_key` and `api_secret` are required.
/// Everything else is optional and passed through to the client untouched.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnyxConfig {
    /// Fully qualified base URL, e.g. `https://api.onyx.dev`
    #[serde(default)]
    pub base_url: String,

    #[serde(default)]
    pub database_id: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub api_secret: String,

    /// Default partition used when a caller supplies none
    #[serde(default)]
    pub partition: Option<String>,

    #[serde(default)]
    pub request_logging_enabled: Option<bool>,

    #[serde(default)]
    pub response_logging_enabled: Option<bool>,

    /// Time-to-live in milliseconds
    #[serde(default)]
    pub ttl: Option<u64>,

    #[serde(default)]
    pub request_timeout_ms: Option<u64>,

    #[serde(default)]
    pub connect_timeout_ms: Option<u64>,
}

fn require(value: &str, name: &'static str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField(name));
    }
    Ok(())
}

impl OnyxConfig {
    /// Check the required credentials, first missing one wins
    pub fn validate(&self) -> ConfigResult<()> {
        require(&self.base_url, "onyx.base-url")?;
        require(&self.database_id, "onyx.database-id")?;
        require(&self.api_key, "onyx.api-key")?;
        require(&self.api_secret, "onyx.api-secret")?;
        Ok(())
    }

    /// Default partition, blank treated as absent
    pub fn default_partition(&self) -> Option<&str> {
        self.partition.as_deref().filter(|p| !p.trim().is_empty())
    }
}

impl fmt::Debug for OnyxConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnyxConfig")
            .field("base_url", &self.base_url)
            .field("database_id", &self.database_id)
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .field("partition", &self.partition)
            .field("request_logging_enabled", &self.request_logging_enabled)
            .field("response_logging_enabled", &self.response_logging_enabled)
            .field("ttl", &self.ttl)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .finish()
    }
}
