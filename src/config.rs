//! Configuration loading and types for blobgate.
//!
//! Configuration is read from a YAML file and deserialized into the
//! [`Config`] struct.  The `storage` section describes the Azure account
//! and the container the adapter is bound to; the account key may be left
//! out of the file and supplied through the environment instead.

use serde::Deserialize;
use std::path::Path;

use crate::adapter::AdapterOptions;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Azure account and container settings.
    pub storage: StorageConfig,

    /// Temporary URL defaults.
    #[serde(default)]
    pub temporary_url: TemporaryUrlConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Azure Blob Storage settings.
#[derive(Clone, Deserialize)]
pub struct StorageConfig {
    /// Azure storage account name.
    pub account: String,
    /// Container the adapter is bound to (`$root` for the root container).
    pub container: String,
    /// Custom base URL for public URLs.
    #[serde(default)]
    pub url: Option<String>,
    /// Key prefix applied to storage operations.
    #[serde(default)]
    pub prefix: Option<String>,
    /// Base64 account key (falls back to the environment).
    #[serde(default)]
    pub account_key: Option<String>,
    /// Blob service endpoint override (sovereign clouds, Azurite).
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("account", &self.account)
            .field("container", &self.container)
            .field("url", &self.url)
            .field("prefix", &self.prefix)
            .field("account_key", &self.account_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl StorageConfig {
    /// Account key from the file, then `AZURE_STORAGE_KEY`, then the
    /// `AccountKey=` entry of `AZURE_STORAGE_CONNECTION_STRING`.
    pub fn resolve_account_key(&self) -> Option<String> {
        resolve_account_key_from(
            self.account_key.as_deref(),
            std::env::var("AZURE_STORAGE_KEY").ok().as_deref(),
            std::env::var("AZURE_STORAGE_CONNECTION_STRING")
                .ok()
                .as_deref(),
        )
    }

    /// Adapter options for this container with the resolved account key.
    pub fn adapter_options(&self) -> AdapterOptions {
        AdapterOptions {
            container: self.container.clone(),
            url: self.url.clone(),
            prefix: self.prefix.clone(),
            account_key: self.resolve_account_key(),
        }
    }
}

fn resolve_account_key_from(
    configured: Option<&str>,
    env_key: Option<&str>,
    connection_string: Option<&str>,
) -> Option<String> {
    if let Some(key) = configured.filter(|k| !k.is_empty()) {
        return Some(key.to_string());
    }
    if let Some(key) = env_key.filter(|k| !k.is_empty()) {
        return Some(key.to_string());
    }
    connection_string.and_then(|conn| {
        conn.split(';')
            .find_map(|part| part.trim().strip_prefix("AccountKey="))
            .filter(|k| !k.is_empty())
            .map(str::to_string)
    })
}

/// Temporary URL defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct TemporaryUrlConfig {
    /// Lifetime of a temporary URL when none is given, in seconds.
    #[serde(default = "default_ttl_seconds")]
    pub default_ttl_seconds: u64,
}

impl Default for TemporaryUrlConfig {
    fn default() -> Self {
        Self {
            default_ttl_seconds: default_ttl_seconds(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: text or json.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// -- Defaults ----------------------------------------------------------------

fn default_ttl_seconds() -> u64 {
    3600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

// -- Loader ------------------------------------------------------------------

/// Load and parse configuration from a YAML file at `path`.
pub fn load_config<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let config: Config = serde_yaml::from_str(&contents)?;
    Ok(config)
}
