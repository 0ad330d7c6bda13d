/**
 * Chat Session Bootstrapper
 *
 * Owns the process's single chat platform connection. Signing in fetches a
 * token from the backend and connects; signing out, `shutdown` or dropping
 * the bootstrapper disconnects.
 *
 * # States
 *
 * ```text
 * Disconnected --sign_in--> Connecting --ok--> Connected
 *                               |                  |
 *                               +--fail--> Error   +--sign_out / shutdown / drop--> Disconnected
 * ```
 *
 * # Overlapping calls
 *
 * Every sign-in or sign-out bumps a generation counter. An attempt records
 * the generation it started under and, after each await, checks it is still
 * current. A stale attempt never touches state; if it managed to open a
 * connection it closes that connection and nothing else. The latest call
 * wins.
 *
 * A connection taken out of the state is retired, not dropped. Retired
 * connections are closed under the connection lock, and every attempt
 * closes whatever is retired before it calls `connect_user` under the same
 * lock, so at most one connection is ever open.
 *
 * The state mutex is never held across an await.
 */

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::client::api::TokenSource;
use crate::client::connector::{ChatConnector, SessionHandle};
use crate::client::error::ClientError;
use crate::shared::{ChatUser, UserId};

/// A user verified by the identity provider on this device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalIdentity {
    pub user_id: UserId,
    /// Identity provider session credential, sent to the backend
    pub credential: String,
    /// Full name
    pub name: Option<String>,
    pub username: Option<String>,
    /// Primary email address
    pub email: Option<String>,
    pub image: Option<String>,
}

impl LocalIdentity {
    pub fn new(user_id: UserId, credential: impl Into<String>) -> Self {
        Self {
            user_id,
            credential: credential.into(),
            name: None,
            username: None,
            email: None,
            image: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Profile presented to the chat platform
    ///
    /// The display name is the first non-blank of full name, username and
    /// email, falling back to the id.
    pub fn chat_user(&self) -> ChatUser {
        let name = [&self.name, &self.username, &self.email]
            .into_iter()
            .flatten()
            .find(|candidate| !candidate.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| self.user_id.to_string());

        ChatUser {
            id: self.user_id.to_string(),
            name,
            image: self.image.clone(),
        }
    }
}

/// Lifecycle of the chat session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting { user_id: String },
    Connected(SessionHandle),
    Error { user_id: String, message: String },
}

#[derive(Debug)]
struct Inner {
    state: SessionState,
    generation: u64,
    last_identity: Option<LocalIdentity>,
    /// Connections taken out of the state but not yet closed
    retired: Vec<SessionHandle>,
}

impl Inner {
    /// Replace the state, retiring the current connection if there is one
    ///
    /// # Returns
    /// `true` if a connection was retired
    fn transition(&mut self, next: SessionState) -> bool {
        match std::mem::replace(&mut self.state, next) {
            SessionState::Connected(handle) => {
                self.retired.push(handle);
                true
            }
            _ => false,
        }
    }
}

/// Connects and disconnects the chat session as the user signs in and out
pub struct SessionBootstrapper {
    tokens: Arc<dyn TokenSource>,
    connector: Arc<dyn ChatConnector>,
    inner: Mutex<Inner>,
    /// Held while retired connections close and while a new one opens
    connection: tokio::sync::Mutex<()>,
}

impl SessionBootstrapper {
    pub fn new(tokens: Arc<dyn TokenSource>, connector: Arc<dyn ChatConnector>) -> Self {
        Self {
            tokens,
            connector,
            inner: Mutex::new(Inner {
                state: SessionState::Disconnected,
                generation: 0,
                last_identity: None,
                retired: Vec::new(),
            }),
            connection: tokio::sync::Mutex::new(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> SessionState {
        self.lock().state.clone()
    }

    /// Handle of the current connection, if connected
    pub fn handle(&self) -> Option<SessionHandle> {
        match &self.lock().state {
            SessionState::Connected(handle) => Some(handle.clone()),
            _ => None,
        }
    }

    /// Open a chat session for `identity`
    ///
    /// Any existing connection is closed before the new attempt starts.
    /// Signing in as the user who is already connected returns the current
    /// handle without reconnecting.
    ///
    /// # Errors
    /// * `ClientError::Superseded` - a later sign-in or sign-out overtook this call
    /// * `ClientError::UserMismatch` - the platform bound the session to someone else
    /// * token and connection errors, which also move the state to `Error`
    pub async fn sign_in(&self, identity: LocalIdentity) -> Result<SessionHandle, ClientError> {
        let (generation, retired) = {
            let mut inner = self.lock();
            if let SessionState::Connected(handle) = &inner.state {
                if handle.user_id == identity.user_id.as_str() {
                    return Ok(handle.clone());
                }
            }

            inner.generation += 1;
            inner.last_identity = Some(identity.clone());
            let retired = inner.transition(SessionState::Connecting {
                user_id: identity.user_id.to_string(),
            });
            (inner.generation, retired)
        };

        if retired {
            let _connection = self.connection.lock().await;
            self.close_retired().await;
        }

        tracing::info!(user_id = %identity.user_id, generation, "Connecting chat session");
        self.attempt(generation, &identity).await
    }

    /// Re-attempt the most recent sign-in with a freshly issued token
    pub async fn retry(&self) -> Result<SessionHandle, ClientError> {
        let identity = self.lock().last_identity.clone().ok_or(ClientError::NotSignedIn)?;
        self.sign_in(identity).await
    }

    /// Close the session and forget the identity
    ///
    /// Any attempt still in flight becomes stale.
    pub async fn sign_out(&self) {
        let retired = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.last_identity = None;
            inner.transition(SessionState::Disconnected)
        };

        if retired {
            let _connection = self.connection.lock().await;
            self.close_retired().await;
        }
    }

    /// Close the session before the process exits
    pub async fn shutdown(&self) {
        tracing::debug!("Shutting down chat session");
        self.sign_out().await;
    }

    async fn attempt(
        &self,
        generation: u64,
        identity: &LocalIdentity,
    ) -> Result<SessionHandle, ClientError> {
        let token = match self.tokens.chat_token(identity).await {
            Ok(token) => token,
            Err(e) => return Err(self.fail(generation, identity, e)),
        };

        if !self.is_current(generation) {
            tracing::debug!(generation, "Token arrived for a superseded attempt");
            return Err(ClientError::Superseded);
        }

        let _connection = self.connection.lock().await;
        self.close_retired().await;
        if !self.is_current(generation) {
            tracing::debug!(generation, "Attempt superseded while waiting to connect");
            return Err(ClientError::Superseded);
        }

        let handle = match self.connector.connect_user(&identity.chat_user(), &token).await {
            Ok(handle) => handle,
            Err(e) => return Err(self.fail(generation, identity, e)),
        };

        if handle.user_id != identity.user_id.as_str() {
            let error = ClientError::UserMismatch {
                expected: identity.user_id.to_string(),
                actual: handle.user_id.clone(),
            };
            self.teardown(handle).await;
            return Err(self.fail(generation, identity, error));
        }

        let stale = {
            let mut inner = self.lock();
            if inner.generation == generation {
                inner.state = SessionState::Connected(handle.clone());
                false
            } else {
                true
            }
        };

        if stale {
            tracing::debug!(generation, "Closing connection of a superseded attempt");
            self.teardown(handle).await;
            return Err(ClientError::Superseded);
        }

        tracing::info!(user_id = %handle.user_id, "Chat session connected");
        Ok(handle)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.lock().generation == generation
    }

    /// Record a failed attempt if it is still current
    fn fail(&self, generation: u64, identity: &LocalIdentity, error: ClientError) -> ClientError {
        let mut inner = self.lock();
        if inner.generation != generation {
            return ClientError::Superseded;
        }

        tracing::warn!("Chat session for {} failed: {}", identity.user_id, error);
        inner.state = SessionState::Error {
            user_id: identity.user_id.to_string(),
            message: error.to_string(),
        };
        error
    }

    /// Close every retired connection; the caller holds `connection`
    async fn close_retired(&self) {
        let retired = std::mem::take(&mut self.lock().retired);
        for handle in retired {
            self.teardown(handle).await;
        }
    }

    async fn teardown(&self, handle: SessionHandle) {
        if let Err(e) = self.connector.disconnect_user(&handle).await {
            tracing::warn!("Failed to disconnect {}: {:?}", handle.connection_id, e);
        }
    }
}

impl Drop for SessionBootstrapper {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        inner.transition(SessionState::Disconnected);
        let open = std::mem::take(&mut inner.retired);
        if open.is_empty() {
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let connector = Arc::clone(&self.connector);
                runtime.spawn(async move {
                    for handle in open {
                        if let Err(e) = connector.disconnect_user(&handle).await {
                            tracing::warn!("Failed to disconnect {} on drop: {:?}", handle.connection_id, e);
                        }
                    }
                });
            }
            Err(_) => tracing::warn!(
                "Dropped chat session outside a runtime; {} connection(s) left open",
                open.len()
            ),
        }
    }
}
