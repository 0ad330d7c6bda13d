/**
 * Stream Chat REST Adapter
 *
 * `ChatPlatform` implementation backed by the hosted chat service's REST API.
 *
 * # Authentication
 *
 * Server-side calls carry a server token (HS256 JWT with `{"server": true}`
 * signed by the API secret) in the `Authorization` header, the
 * `stream-auth-type: jwt` header and the `api_key` query parameter.
 *
 * User tokens are signed locally with the same secret and carry `user_id`,
 * `iat` and, when a TTL is configured, `exp`. The platform validates them
 * when the client connects.
 */

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::{header::AUTHORIZATION, Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::backend::chat::platform::{ChannelRef, ChatPlatform, PlatformError};
use crate::shared::ChatUser;

/// Default REST endpoint of the hosted chat service
pub const DEFAULT_STREAM_BASE_URL: &str = "https://chat.stream-io-api.com";

/// Connection settings for the chat service
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Public API key
    pub api_key: String,
    /// API secret used to sign server and user tokens
    pub api_secret: String,
    /// REST base URL
    pub base_url: String,
    /// Lifetime of user tokens in seconds; `None` issues non-expiring tokens
    pub token_ttl_secs: Option<i64>,
}

impl StreamConfig {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            base_url: DEFAULT_STREAM_BASE_URL.to_string(),
            token_ttl_secs: Some(3600),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_token_ttl_secs(mut self, ttl: Option<i64>) -> Self {
        self.token_ttl_secs = ttl;
        self
    }
}

/// Claims of a user token
#[derive(Debug, Serialize, Deserialize)]
pub struct UserTokenClaims {
    pub user_id: String,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

#[derive(Serialize)]
struct ServerClaims {
    server: bool,
}

#[derive(Serialize)]
struct UpsertUsersRequest<'a> {
    users: HashMap<&'a str, &'a ChatUser>,
}

#[derive(Serialize)]
struct QueryChannelsRequest {
    filter_conditions: serde_json::Value,
    watch: bool,
    state: bool,
    presence: bool,
}

#[derive(Deserialize)]
struct QueryChannelsResponse {
    #[serde(default)]
    channels: Vec<ChannelState>,
}

#[derive(Deserialize)]
struct ChannelState {
    channel: ChannelData,
}

#[derive(Deserialize)]
struct ChannelData {
    id: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Serialize)]
struct AddMembersRequest<'a> {
    add_members: &'a [String],
}

/// REST client for the hosted chat service
#[derive(Debug, Clone)]
pub struct StreamPlatform {
    config: StreamConfig,
    client: Client,
}

impl StreamPlatform {
    /// Create an adapter, rejecting an empty key or secret
    pub fn new(config: StreamConfig) -> Result<Self, PlatformError> {
        if config.api_key.trim().is_empty() {
            return Err(PlatformError::Config("API key is empty".to_string()));
        }
        if config.api_secret.trim().is_empty() {
            return Err(PlatformError::Config("API secret is empty".to_string()));
        }
        Url::parse(&config.base_url)
            .map_err(|e| PlatformError::Config(format!("invalid base URL: {}", e)))?;

        Ok(Self {
            config,
            client: Client::new(),
        })
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.config.api_secret.as_bytes())
    }

    fn server_token(&self) -> Result<String, PlatformError> {
        Ok(encode(
            &Header::default(),
            &ServerClaims { server: true },
            &self.encoding_key(),
        )?)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, PlatformError> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| PlatformError::Config(format!("invalid base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| PlatformError::Config("base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, PlatformError> {
        let url = self.endpoint(segments)?;
        Ok(self
            .client
            .request(method, url)
            .query(&[("api_key", self.config.api_key.as_str())])
            .header(AUTHORIZATION, self.server_token()?)
            .header("stream-auth-type", "jwt"))
    }

    async fn check(response: Response) -> Result<Response, PlatformError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_else(|e| {
            tracing::debug!("Failed to read chat platform error body: {:?}", e);
            String::new()
        });
        Err(PlatformError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl ChatPlatform for StreamPlatform {
    async fn upsert_user(&self, user: &ChatUser) -> Result<(), PlatformError> {
        let body = UpsertUsersRequest {
            users: HashMap::from([(user.id.as_str(), user)]),
        };
        let response = self.request(Method::POST, &["users"])?.json(&body).send().await?;
        Self::check(response).await?;

        tracing::info!(user_id = %user.id, "Chat user upserted: {}", user.name);
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), PlatformError> {
        let response = self
            .request(Method::DELETE, &["users", user_id])?
            .query(&[("mark_messages_deleted", "false"), ("hard_delete", "true")])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(user_id = %user_id, "Chat user already absent");
            return Ok(());
        }
        Self::check(response).await?;

        tracing::info!(user_id = %user_id, "Chat user deleted");
        Ok(())
    }

    async fn create_token(&self, user_id: &str) -> Result<String, PlatformError> {
        let iat = Utc::now().timestamp();
        let claims = UserTokenClaims {
            user_id: user_id.to_string(),
            iat,
            exp: self.config.token_ttl_secs.map(|ttl| iat + ttl),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding_key())?)
    }

    async fn query_public_channels(&self) -> Result<Vec<ChannelRef>, PlatformError> {
        let body = QueryChannelsRequest {
            filter_conditions: serde_json::json!({ "discoverable": true }),
            watch: false,
            state: false,
            presence: false,
        };
        let response = self.request(Method::POST, &["channels"])?.json(&body).send().await?;
        let parsed: QueryChannelsResponse = Self::check(response).await?.json().await?;

        Ok(parsed
            .channels
            .into_iter()
            .map(|state| ChannelRef::new(state.channel.kind, state.channel.id))
            .collect())
    }

    async fn add_members(
        &self,
        channel: &ChannelRef,
        user_ids: &[String],
    ) -> Result<(), PlatformError> {
        let response = self
            .request(Method::POST, &["channels", &channel.kind, &channel.id])?
            .json(&AddMembersRequest { add_members: user_ids })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
