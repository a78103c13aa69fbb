//! Client configuration.
//!
//! Values come from environment variables or a TOML document. The API base
//! URL falls back from `WORLDSUN_API_BASE_URL` to `WORLDSUN_STRATEGY_API_URL`
//! and finally to an empty string, which makes endpoints same-origin
//! relative paths. Strategy dashboards always use `WORLDSUN_STRATEGY_API_URL`
//! on its own.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Primary API base URL variable.
pub const ENV_API_BASE_URL: &str = "WORLDSUN_API_BASE_URL";
/// Strategy service URL; also the fallback API base URL.
pub const ENV_STRATEGY_API_URL: &str = "WORLDSUN_STRATEGY_API_URL";
/// Public site URL variable.
pub const ENV_APP_URL: &str = "WORLDSUN_APP_URL";
/// Request timeout override, in seconds.
pub const ENV_TIMEOUT_SECS: &str = "WORLDSUN_HTTP_TIMEOUT_SECS";

/// Public site URL used when none is configured.
pub const DEFAULT_APP_URL: &str = "https://worldsun-official-website.zeabur.app";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("Invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// An environment variable held a value of the wrong shape.
    #[error("Invalid value for {key}: {value}")]
    InvalidValue {
        /// Variable name
        key: &'static str,
        /// Offending value
        value: String,
    },
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Backend API base URL; empty means same-origin.
    #[serde(default)]
    pub api_base_url: String,

    /// Strategy service base URL; empty means same-origin.
    #[serde(default)]
    pub strategy_api_url: String,

    /// Public URL of the site.
    #[serde(default = "default_app_url")]
    pub app_url: String,

    /// Transport settings.
    #[serde(default)]
    pub transport: TransportSettings,
}

/// Transport-related configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransportSettings {
    /// Connect and request timeout in seconds
    pub timeout_secs: u64,

    /// Body read size (KB)
    pub chunk_size_kb: usize,

    /// User-Agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            chunk_size_kb: 16,
            user_agent: None,
        }
    }
}

fn default_app_url() -> String {
    DEFAULT_APP_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            strategy_api_url: String::new(),
            app_url: default_app_url(),
            transport: TransportSettings::default(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let strategy_api_url = lookup(ENV_STRATEGY_API_URL);
        let api_base_url = match lookup(ENV_API_BASE_URL).or_else(|| strategy_api_url.clone()) {
            Some(url) => url,
            None => {
                tracing::debug!("no API base URL configured, using same-origin paths");
                String::new()
            }
        };
        let strategy_api_url = strategy_api_url.unwrap_or_default();

        let app_url = lookup(ENV_APP_URL).unwrap_or_else(|| {
            tracing::debug!(key = ENV_APP_URL, fallback = DEFAULT_APP_URL, "using default app URL");
            default_app_url()
        });

        let mut transport = TransportSettings::default();
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            transport.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_TIMEOUT_SECS,
                value: raw.clone(),
            })?;
        }

        Ok(Self {
            api_base_url,
            strategy_api_url,
            app_url,
            transport,
        })
    }

    /// Parses configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML or has wrong types.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// API base URL with a single trailing slash removed.
    #[must_use]
    pub fn api_url(&self) -> &str {
        self.api_base_url
            .strip_suffix('/')
            .unwrap_or(&self.api_base_url)
    }

    /// Joins `path` onto the API base URL.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url(), path)
    }

    /// Joins `path` onto the strategy service URL, minus one trailing slash.
    #[must_use]
    pub fn strategy_endpoint(&self, path: &str) -> String {
        let base = self
            .strategy_api_url
            .strip_suffix('/')
            .unwrap_or(&self.strategy_api_url);
        format!("{base}{path}")
    }

    /// HTTP transport settings derived from this configuration.
    #[cfg(feature = "http")]
    #[must_use]
    pub fn http_config(&self) -> crate::streaming::HttpConfig {
        crate::streaming::HttpConfig {
            timeout_secs: self.transport.timeout_secs,
            user_agent: self.transport.user_agent.clone(),
            chunk_size: self.transport.chunk_size_kb.max(1) * 1024,
            ..Default::default()
        }
    }
}
