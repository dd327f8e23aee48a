//! Immutable gateway configuration.
//!
//! Built once at startup and shared read-only with the invoker. Nothing in the
//! engine mutates it afterwards.

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

/// Default base URL of the authenticated Web API
pub const DEFAULT_API_BASE_URL: &str = "https://api.steampowered.com";

/// Default base URL of the public storefront
pub const DEFAULT_STORE_BASE_URL: &str = "https://store.steampowered.com";

/// Default transport timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No credential was supplied
    #[error("missing Steam Web API key (set STEAM_API_KEY or pass --api-key)")]
    MissingCredential,

    /// A base URL is unusable
    #[error("invalid base URL {url}: {reason}")]
    InvalidBaseUrl {
        /// The rejected URL
        url: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Process-wide configuration for outbound calls
#[derive(Debug)]
pub struct GatewayConfig {
    api_key: SecretString,
    api_base_url: String,
    store_base_url: String,
    timeout: Duration,
    user_agent: String,
}

impl GatewayConfig {
    /// Create a configuration with default endpoints
    ///
    /// # Errors
    ///
    /// Returns error if the credential is empty
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential);
        }
        Ok(Self {
            api_key: SecretString::from(api_key),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            store_base_url: DEFAULT_STORE_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("steamgate/", env!("CARGO_PKG_VERSION")).to_string(),
        })
    }

    /// Build from an optional credential, failing when it is absent
    ///
    /// # Errors
    ///
    /// Returns error if the credential is absent or empty
    pub fn from_optional_key(api_key: Option<String>) -> Result<Self, ConfigError> {
        Self::new(api_key.ok_or(ConfigError::MissingCredential)?)
    }

    /// Override the Web API base URL
    ///
    /// # Errors
    ///
    /// Returns error if the URL is not http(s)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Result<Self, ConfigError> {
        self.api_base_url = normalize_base_url(url.into())?;
        Ok(self)
    }

    /// Override the storefront base URL
    ///
    /// # Errors
    ///
    /// Returns error if the URL is not http(s)
    pub fn with_store_base_url(mut self, url: impl Into<String>) -> Result<Self, ConfigError> {
        self.store_base_url = normalize_base_url(url.into())?;
        Ok(self)
    }

    /// Set the transport timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header value
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// The credential, for attaching to outbound query parameters only
    #[must_use]
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Web API base URL, without trailing slash
    #[must_use]
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Storefront base URL, without trailing slash
    #[must_use]
    pub fn store_base_url(&self) -> &str {
        &self.store_base_url
    }

    /// Transport timeout
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// User-Agent header value
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

fn normalize_base_url(url: String) -> Result<String, ConfigError> {
    let trimmed = url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl {
            url,
            reason: "scheme must be http or https".to_string(),
        });
    }
    if trimmed.contains('?') || trimmed.contains('#') {
        return Err(ConfigError::InvalidBaseUrl {
            url,
            reason: "base URL must not carry a query or fragment".to_string(),
        });
    }
    Ok(trimmed.to_string())
}
