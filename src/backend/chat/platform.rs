/**
 * Chat Platform Capability
 *
 * The external chat service owns message storage, delivery and presence.
 * This backend only needs a narrow slice of it: mirroring users into the
 * platform registry, minting user tokens, and adding members to public
 * channels. `ChatPlatform` is that slice, so handlers and tests depend on the
 * trait rather than on a concrete HTTP client.
 */

use async_trait::async_trait;
use thiserror::Error;

use crate::shared::ChatUser;

/// Errors raised by a chat platform adapter
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The platform could not be reached
    #[error("chat platform request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform answered with a non-success status
    #[error("chat platform returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body as returned by the platform
        body: String,
    },

    /// Token signing failed
    #[error("failed to sign chat token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// The platform answered with a body the adapter cannot use
    #[error("unexpected chat platform response: {0}")]
    InvalidResponse(String),

    /// The adapter is misconfigured (missing key or secret)
    #[error("chat platform misconfigured: {0}")]
    Config(String),
}

/// Reference to a channel on the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRef {
    /// Channel type, e.g. `messaging`
    pub kind: String,
    /// Channel id within its type
    pub id: String,
}

impl ChannelRef {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

/// Server-side capabilities consumed from the chat platform
///
/// Implementations must be safe to share across request handlers.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Create or update a user in the platform registry
    async fn upsert_user(&self, user: &ChatUser) -> Result<(), PlatformError>;

    /// Delete a user from the platform registry
    ///
    /// Deleting a user the platform does not know about succeeds.
    async fn delete_user(&self, user_id: &str) -> Result<(), PlatformError>;

    /// Mint a session token scoped to `user_id`
    async fn create_token(&self, user_id: &str) -> Result<String, PlatformError>;

    /// List channels flagged as discoverable
    async fn query_public_channels(&self) -> Result<Vec<ChannelRef>, PlatformError>;

    /// Add members to a channel
    async fn add_members(
        &self,
        channel: &ChannelRef,
        user_ids: &[String],
    ) -> Result<(), PlatformError>;
}
