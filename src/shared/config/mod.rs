//! Application configuration module
//!
//! Provides the client-facing configuration types: where the backend lives,
//! where the chat platform lives, and which platform API key to present.

use serde::Deserialize;
use thiserror::Error;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backend base URL (serves `/api/chat/token`)
    pub server_url: Option<String>,
    /// Chat platform base URL the client connects to directly
    pub chat_base_url: Option<String>,
    /// Public chat platform API key
    pub chat_api_key: Option<String>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    ///
    /// Every URL that is set must parse as an absolute URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for url in [&self.server_url, &self.chat_base_url].into_iter().flatten() {
            reqwest::Url::parse(url).map_err(|_| ConfigError::InvalidUrl(url.clone()))?;
        }
        if let Some(key) = &self.chat_api_key {
            if key.trim().is_empty() {
                return Err(ConfigError::MissingValue("chat_api_key"));
            }
        }
        Ok(())
    }

    /// Overlay `other` on top of `self`; set fields in `other` win
    pub fn merge(self, other: AppConfig) -> AppConfig {
        AppConfig {
            server_url: other.server_url.or(self.server_url),
            chat_base_url: other.chat_base_url.or(self.chat_base_url),
            chat_api_key: other.chat_api_key.or(self.chat_api_key),
        }
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    chat_base_url: Option<String>,
    chat_api_key: Option<String>,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Set the chat platform URL
    pub fn chat_base_url(mut self, url: impl Into<String>) -> Self {
        self.chat_base_url = Some(url.into());
        self
    }

    /// Set the chat platform API key
    pub fn chat_api_key(mut self, key: impl Into<String>) -> Self {
        self.chat_api_key = Some(key.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let config = AppConfig {
            server_url: self.server_url,
            chat_base_url: self.chat_base_url,
            chat_api_key: self.chat_api_key,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {name}: {message}")]
    InvalidValue {
        name: &'static str,
        message: String,
    },
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
