//! Client configuration
//!
//! Settings come from an optional TOML file in the user's config directory
//! (`<config_dir>/fullslack/config.toml`, or the path in `FULLSLACK_CONFIG`),
//! with environment variables layered on top.
//!
//! ```toml
//! server_url = "http://127.0.0.1:3000"
//! chat_base_url = "https://chat.example.com"
//! chat_api_key = "public-key"
//! ```

use std::path::{Path, PathBuf};

use crate::shared::config::{AppConfig, ConfigError};

/// Default server URL
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "FULLSLACK_CONFIG";

/// Client configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    app: AppConfig,
}

impl Config {
    /// Load the config file (if any) and apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .or_else(default_path);

        let file = match path {
            Some(path) if path.exists() => {
                tracing::debug!("Loading client config from {}", path.display());
                read_file(&path)?
            }
            _ => AppConfig::default(),
        };

        Self::from_app(file.merge(from_env()))
    }

    /// Wrap an already assembled `AppConfig`
    pub fn from_app(app: AppConfig) -> Result<Self, ConfigError> {
        app.validate()?;
        Ok(Self { app })
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url().trim_end_matches('/'), path)
    }

    pub fn server_url(&self) -> &str {
        self.app.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    /// Chat platform base URL; required to open a session
    pub fn chat_base_url(&self) -> Result<&str, ConfigError> {
        self.app
            .chat_base_url
            .as_deref()
            .ok_or(ConfigError::MissingValue("chat_base_url"))
    }

    /// Public chat platform API key; required to open a session
    pub fn chat_api_key(&self) -> Result<&str, ConfigError> {
        self.app
            .chat_api_key
            .as_deref()
            .ok_or(ConfigError::MissingValue("chat_api_key"))
    }
}

/// `<config_dir>/fullslack/config.toml`
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("fullslack").join("config.toml"))
}

/// Parse a TOML config file
pub fn read_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

/// Read `FULLSLACK_SERVER_URL`, `FULLSLACK_CHAT_BASE_URL` and `FULLSLACK_CHAT_API_KEY`
pub fn from_env() -> AppConfig {
    let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
    AppConfig {
        server_url: var("FULLSLACK_SERVER_URL"),
        chat_base_url: var("FULLSLACK_CHAT_BASE_URL"),
        chat_api_key: var("FULLSLACK_CHAT_API_KEY"),
    }
}
