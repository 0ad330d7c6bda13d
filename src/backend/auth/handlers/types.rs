/**
 * Identity Webhook Types
 *
 * Payloads delivered by the identity provider's webhook. Only the fields the
 * directory needs are modelled; everything else in the event is ignored.
 */

use serde::{Deserialize, Serialize};

use crate::backend::auth::users::UserProfile;
use crate::shared::SharedError;

/// Lifecycle event type for a newly registered user
pub const USER_CREATED: &str = "user.created";
/// Lifecycle event type for a changed profile
pub const USER_UPDATED: &str = "user.updated";
/// Lifecycle event type for a deleted account
pub const USER_DELETED: &str = "user.deleted";

/// Webhook envelope
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    /// Event type, e.g. `user.created`
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event payload; its shape depends on `event_type`
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct EmailAddress {
    pub email_address: String,
}

/// `data` of `user.created` and `user.updated`
#[derive(Debug, Deserialize)]
pub struct UserEventData {
    pub id: String,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl UserEventData {
    /// Convert the event payload into a directory profile
    ///
    /// The first listed email address is used. The display name joins first
    /// and last name, skipping missing parts.
    pub fn into_profile(self) -> Result<UserProfile, SharedError> {
        if self.id.trim().is_empty() {
            return Err(SharedError::validation("id", "user id must not be empty"));
        }

        let email = self
            .email_addresses
            .into_iter()
            .next()
            .map(|e| e.email_address)
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| SharedError::validation("email_addresses", "no email address on user"))?;

        let display_name = [self.first_name, self.last_name]
            .into_iter()
            .flatten()
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(UserProfile {
            external_id: self.id,
            email,
            display_name,
            avatar_url: self.image_url.unwrap_or_default(),
        })
    }
}

/// `data` of `user.deleted`
#[derive(Debug, Deserialize)]
pub struct DeletedUserData {
    pub id: String,
}

/// Acknowledgement returned to the webhook sender
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookAck {
    /// `processed` or `ignored`
    pub status: String,
}

impl WebhookAck {
    pub fn processed() -> Self {
        Self { status: "processed".to_string() }
    }

    pub fn ignored() -> Self {
        Self { status: "ignored".to_string() }
    }
}
