/**
 * Client Error Types
 *
 * Errors raised while fetching a chat token or managing the chat session.
 */

use thiserror::Error;

use crate::shared::ConfigError;

/// Client-side errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend or chat platform could not be reached
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend refused the session credential
    #[error("not signed in with the identity provider")]
    Unauthorized,

    /// The backend answered with an error status
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The backend answered 200 without a usable token
    #[error("invalid chat token: {0}")]
    InvalidToken(String),

    /// The chat platform refused the connection
    #[error("chat platform rejected connection: {0}")]
    ConnectRejected(String),

    /// The chat platform bound the session to another user
    #[error("session bound to {actual}, expected {expected}")]
    UserMismatch { expected: String, actual: String },

    /// A newer sign-in or sign-out overtook this attempt
    #[error("connection attempt superseded")]
    Superseded,

    /// `retry` was called with no previous sign-in
    #[error("no identity to retry with")]
    NotSignedIn,

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// Whether signing in again might succeed without user action
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::ConnectRejected(_) => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
