/**
 * Server Configuration
 *
 * This module handles loading and validation of server configuration from
 * environment variables, and the optional SQLite user store.
 *
 * # Configuration Sources
 *
 * Configuration is read from the process environment (`main` loads `.env`
 * through `dotenv` first), with defaults for local development where one
 * makes sense.
 *
 * # Error Handling
 *
 * Missing chat platform or identity settings are fatal: the token endpoint
 * cannot work without them. The database is optional. When it is not
 * configured or fails to open, the error is logged and the server runs
 * without directory sync.
 */

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::backend::auth::identity::{IdentityConfig, IdentityKey};
use crate::backend::chat::stream::StreamConfig;
use crate::shared::ConfigError;

/// Port used when `SERVER_PORT` is unset
pub const DEFAULT_PORT: u16 = 3000;

/// Allowed origin used when `CLIENT_URL` is unset
pub const DEFAULT_CLIENT_URL: &str = "http://localhost:5173";

/// Everything the server needs to start
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// SQLite URL of the user store; `None` disables directory sync
    pub database_url: Option<String>,
    pub stream: StreamConfig,
    pub identity: IdentityConfig,
    /// Origins allowed by CORS
    pub client_origins: Vec<String>,
    /// Shared secret expected on identity webhooks
    pub webhook_secret: Option<String>,
}

impl ServerConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match var("SERVER_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                name: "SERVER_PORT",
                message: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let api_key = var("STREAM_API_KEY").ok_or(ConfigError::MissingValue("STREAM_API_KEY"))?;
        let api_secret =
            var("STREAM_API_SECRET").ok_or(ConfigError::MissingValue("STREAM_API_SECRET"))?;
        let mut stream = StreamConfig::new(api_key, api_secret);
        if let Some(base_url) = var("STREAM_BASE_URL") {
            stream = stream.with_base_url(base_url);
        }
        if let Some(raw) = var("STREAM_TOKEN_TTL_SECS") {
            let ttl = raw.parse::<i64>().map_err(|e| ConfigError::InvalidValue {
                name: "STREAM_TOKEN_TTL_SECS",
                message: e.to_string(),
            })?;
            // 0 disables expiry
            stream = stream.with_token_ttl_secs((ttl > 0).then_some(ttl));
        }

        let key = match (var("IDENTITY_JWT_KEY"), var("IDENTITY_JWT_SECRET")) {
            (Some(pem), _) => IdentityKey::RsaPem(pem.replace("\\n", "\n")),
            (None, Some(secret)) => IdentityKey::Secret(secret),
            (None, None) => return Err(ConfigError::MissingValue("IDENTITY_JWT_KEY")),
        };
        let mut identity = IdentityConfig::new(key)
            .with_authorized_parties(split_list(var("IDENTITY_AUTHORIZED_PARTIES")));
        if let Some(issuer) = var("IDENTITY_ISSUER") {
            identity = identity.with_issuer(issuer);
        }

        let mut client_origins = split_list(var("CLIENT_URL"));
        if client_origins.is_empty() {
            client_origins.push(DEFAULT_CLIENT_URL.to_string());
        }

        Ok(Self {
            port,
            database_url: var("DATABASE_URL"),
            stream,
            identity,
            client_origins,
            webhook_secret: var("WEBHOOK_SECRET"),
        })
    }
}

fn split_list(raw: Option<String>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Open a SQLite pool and apply migrations
///
/// In-memory databases live as long as their connection, so they get a
/// single connection that is never recycled.
///
/// # Arguments
/// * `database_url` - e.g. `sqlite://fullslack.db` or `sqlite::memory:`
pub async fn connect_database(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options.connect_with(options).await?;
    sqlx::migrate!().run(&pool).await?;
    Ok(pool)
}

/// Load the optional user store
///
/// # Returns
///
/// - `Some(SqlitePool)` if the database is configured and ready
/// - `None` if `database_url` is unset or the connection fails
///
/// Errors are logged but do not prevent server startup.
pub async fn load_database(database_url: Option<&str>) -> Option<SqlitePool> {
    let Some(database_url) = database_url else {
        tracing::warn!("DATABASE_URL not set. User directory sync will be disabled.");
        return None;
    };

    tracing::info!("Connecting to database...");

    match connect_database(database_url).await {
        Ok(pool) => {
            tracing::info!("Database ready, migrations applied");
            Some(pool)
        }
        Err(e) => {
            tracing::error!("Failed to open database: {:?}", e);
            tracing::warn!("User directory sync will be disabled.");
            None
        }
    }
}
