/**
 * Chat Token Issuer
 *
 * Mints chat platform session tokens for users the credential mediator has
 * already verified. The issuer trusts its caller and performs no identity
 * checks of its own; it only guards against a missing user id so that the
 * platform is never asked to sign a token for nobody.
 *
 * Tokens are never cached or persisted. Every call asks the platform for a
 * fresh token, and platform failures propagate instead of degrading into an
 * empty token the client would then try to connect with.
 */

use std::sync::Arc;

use crate::backend::chat::platform::{ChatPlatform, PlatformError};
use crate::backend::error::BackendError;
use crate::shared::UserId;

/// Stateless token minting service
#[derive(Clone)]
pub struct TokenIssuer {
    platform: Arc<dyn ChatPlatform>,
}

impl TokenIssuer {
    pub fn new(platform: Arc<dyn ChatPlatform>) -> Self {
        Self { platform }
    }

    /// Issue a session token for `user_id`
    ///
    /// # Errors
    ///
    /// * `BackendError::InvalidArgument` - `user_id` is absent or blank; the
    ///   platform is not called
    /// * `BackendError::TokenIssuance` - the platform failed to mint a token
    pub async fn issue_token(&self, user_id: Option<&str>) -> Result<String, BackendError> {
        let user_id = user_id
            .ok_or_else(|| BackendError::invalid_argument("user id is required to issue a chat token"))
            .and_then(|raw| UserId::parse(raw).map_err(BackendError::from))?;

        let token = self
            .platform
            .create_token(user_id.as_str())
            .await
            .map_err(BackendError::TokenIssuance)?;
        if token.is_empty() {
            return Err(BackendError::TokenIssuance(PlatformError::InvalidResponse(
                "empty token".to_string(),
            )));
        }

        tracing::debug!(user_id = %user_id, "Issued chat token");
        Ok(token)
    }
}
