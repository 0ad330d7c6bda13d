/**
 * Wire Types
 *
 * Request and response bodies exchanged between the client and the backend,
 * plus the identifiers both sides agree on.
 *
 * The backend serializes these in its handlers and the client deserializes
 * them when fetching chat tokens, so the JSON shape is defined once here.
 */
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::error::SharedError;

/// Stable user identifier issued by the identity provider
///
/// The chat platform uses the same value as its user id, so local records,
/// platform users and session tokens all resolve to one participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Parse a user id, rejecting empty or whitespace-only input
    ///
    /// Surrounding whitespace is trimmed.
    pub fn parse(raw: &str) -> Result<Self, SharedError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SharedError::validation("user_id", "user id must not be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Response body of `GET /api/chat/token`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub token: String,
}

/// JSON error body returned by every failing backend endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub message: String,
    /// Optional detail (upstream error text) for 5xx responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// User record as mirrored into the chat platform's user registry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatUser {
    /// Platform user id (equal to the identity provider's user id)
    pub id: String,
    /// Display name shown in channels
    pub name: String,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
