/**
 * Backend API Client
 *
 * Fetches chat tokens from `GET /api/chat/token`, presenting the identity
 * provider's session credential as a bearer token.
 */

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client, StatusCode};

use crate::client::config::Config;
use crate::client::error::ClientError;
use crate::client::session::LocalIdentity;
use crate::shared::{ErrorResponse, TokenResponse};

/// Source of chat platform tokens for a signed-in user
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn chat_token(&self, identity: &LocalIdentity) -> Result<String, ClientError>;
}

/// HTTP client for the fullslack backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: Config,
}

impl ApiClient {
    pub fn new(config: Config) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Get a chat token for the holder of `session_credential`
    ///
    /// # Errors
    /// * `ClientError::Unauthorized` - the backend returned 401
    /// * `ClientError::Status` - any other error status, with the server's message
    /// * `ClientError::InvalidToken` - success status without a token
    pub async fn fetch_chat_token(&self, session_credential: &str) -> Result<String, ClientError> {
        let url = self.config.api_url("/api/chat/token");

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", session_credential))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_else(|e| {
                tracing::debug!("Failed to read token error body: {:?}", e);
                String::new()
            });
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|body| match body.details {
                    Some(details) => format!("{} ({})", body.message, details),
                    None => body.message,
                })
                .unwrap_or(text);
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidToken(e.to_string()))?;
        if body.token.trim().is_empty() {
            return Err(ClientError::InvalidToken("empty token".to_string()));
        }

        Ok(body.token)
    }
}

#[async_trait]
impl TokenSource for ApiClient {
    async fn chat_token(&self, identity: &LocalIdentity) -> Result<String, ClientError> {
        self.fetch_chat_token(&identity.credential).await
    }
}
