//! Client configuration
//!
//! [`ClientConfig`] is resolved once when a [`TronGridClient`](crate::TronGridClient)
//! is built and never mutated afterwards. It can be assembled with the
//! builder, read from the environment, or deserialized from JSON.

use crate::error::{Error, Result};
use crate::http::RateLimiterConfig;
use crate::types::Network;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use url::Url;

/// Header carrying the TronGrid API key
pub const API_KEY_HEADER: &str = "TRON-PRO-API-KEY";

/// Configuration for the TronGrid client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Network whose public endpoint is used when `base_url` is unset
    pub network: Network,
    /// Explicit base URL, overrides `network`
    pub base_url: Option<String>,
    /// API key sent in the `TRON-PRO-API-KEY` header
    pub api_key: Option<String>,
    /// Per-request timeout
    #[serde(with = "duration_secs", rename = "timeout_secs")]
    pub timeout: Duration,
    /// Client-side throttling; `None` disables it
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            base_url: None,
            api_key: None,
            timeout: Duration::from_secs(30),
            rate_limit: None,
            user_agent: format!("trongrid-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Read configuration from `TRONGRID_*` environment variables
    ///
    /// Unset variables keep their defaults. `TRONGRID_RPS` enables the
    /// built-in limiter with a burst equal to the rate, or with the quota of
    /// the account tier when set to `auto`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(network) = env::var("TRONGRID_NETWORK") {
            config.network = network.parse()?;
        }

        if let Ok(base_url) = env::var("TRONGRID_BASE_URL") {
            config.base_url = Some(base_url);
        }

        if let Ok(api_key) = env::var("TRONGRID_API_KEY") {
            if !api_key.is_empty() {
                config.api_key = Some(api_key);
            }
        }

        if let Ok(rps) = env::var("TRONGRID_RPS") {
            config.rate_limit = Some(config.parse_rps(&rps)?);
        }

        Ok(config)
    }

    /// Service quota for this configuration's account tier
    pub fn tier_rate_limit(&self) -> RateLimiterConfig {
        if self.api_key.is_some() {
            RateLimiterConfig::with_api_key()
        } else {
            RateLimiterConfig::anonymous()
        }
    }

    fn parse_rps(&self, value: &str) -> Result<RateLimiterConfig> {
        if value.eq_ignore_ascii_case("auto") {
            return Ok(self.tier_rate_limit());
        }

        let rps = value
            .parse::<u32>()
            .map_err(|e| Error::config(format!("TRONGRID_RPS: {e}")))?;
        Ok(RateLimiterConfig::new(rps, rps))
    }

    /// Base URL without a trailing slash
    pub fn resolved_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.network.base_url())
            .trim_end_matches('/')
    }

    /// Check that the configuration can be used to build a client
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(self.resolved_base_url())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "base URL must be http(s), got '{}'",
                url.scheme()
            )));
        }

        if self.timeout.is_zero() {
            return Err(Error::config("timeout must be greater than zero"));
        }

        Ok(())
    }
}

/// Builder for [`ClientConfig`]
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the network
    pub fn network(mut self, network: Network) -> Self {
        self.config.network = network;
        self
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
