/**
 * Chat Platform Connector
 *
 * The client talks to the chat platform directly once it holds a token.
 * `ChatConnector` is the narrow slice the session bootstrapper needs: open a
 * connection for one user and close it again.
 *
 * `RestConnector` speaks the platform's connection endpoints:
 *
 * - `POST {base}/connect` with the user token and profile, answering
 *   `{ "connection_id": ..., "me": { "id": ... } }`
 * - `POST {base}/disconnect` with `{ "connection_id": ... }`
 */

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client, Response, Url};
use serde::{Deserialize, Serialize};

use crate::client::error::ClientError;
use crate::shared::{ChatUser, ConfigError};

/// A live chat platform connection bound to one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    /// User the platform bound the connection to
    pub user_id: String,
    pub connection_id: String,
}

/// Opens and closes chat platform connections
#[async_trait]
pub trait ChatConnector: Send + Sync {
    /// Connect `user` with a token minted for them
    async fn connect_user(&self, user: &ChatUser, token: &str) -> Result<SessionHandle, ClientError>;

    /// Close a connection opened by `connect_user`
    async fn disconnect_user(&self, handle: &SessionHandle) -> Result<(), ClientError>;
}

#[derive(Serialize)]
struct ConnectRequest<'a> {
    user: &'a ChatUser,
}

#[derive(Deserialize)]
struct ConnectResponse {
    connection_id: String,
    me: ConnectedUser,
}

#[derive(Deserialize)]
struct ConnectedUser {
    id: String,
}

#[derive(Serialize)]
struct DisconnectRequest<'a> {
    connection_id: &'a str,
}

/// REST connector for the hosted chat service
#[derive(Debug, Clone)]
pub struct RestConnector {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl RestConnector {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|_| ClientError::Config(ConfigError::InvalidUrl(base_url.to_string())))?;
        Ok(Self {
            client: Client::new(),
            base_url,
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self, name: &str) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(ConfigError::InvalidUrl(self.base_url.to_string())))?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }

    async fn rejected(response: Response) -> ClientError {
        let status = response.status();
        let body = response.text().await.unwrap_or_else(|e| {
            tracing::debug!("Failed to read connect rejection body: {:?}", e);
            String::new()
        });
        ClientError::ConnectRejected(format!("{}: {}", status.as_u16(), body))
    }
}

#[async_trait]
impl ChatConnector for RestConnector {
    async fn connect_user(&self, user: &ChatUser, token: &str) -> Result<SessionHandle, ClientError> {
        let response = self
            .client
            .post(self.endpoint("connect")?)
            .query(&[("api_key", self.api_key.as_str())])
            .header(AUTHORIZATION, token)
            .header("stream-auth-type", "jwt")
            .json(&ConnectRequest { user })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejected(response).await);
        }

        let body: ConnectResponse = response
            .json()
            .await
            .map_err(|e| ClientError::ConnectRejected(format!("unexpected response: {}", e)))?;

        tracing::info!(user_id = %body.me.id, connection_id = %body.connection_id, "Chat connection opened");
        Ok(SessionHandle {
            user_id: body.me.id,
            connection_id: body.connection_id,
        })
    }

    async fn disconnect_user(&self, handle: &SessionHandle) -> Result<(), ClientError> {
        let response = self
            .client
            .post(self.endpoint("disconnect")?)
            .query(&[("api_key", self.api_key.as_str())])
            .json(&DisconnectRequest {
                connection_id: &handle.connection_id,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejected(response).await);
        }

        tracing::info!(user_id = %handle.user_id, connection_id = %handle.connection_id, "Chat connection closed");
        Ok(())
    }
}
