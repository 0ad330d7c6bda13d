/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct holds:
 * - The identity verifier used by the identity layer
 * - The token issuer behind `GET /api/chat/token`
 * - Optional services (user directory, webhook secret)
 *
 * Nothing in here is mutated per request. Optional services are `None`
 * when their configuration is absent, and handlers check for that.
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::auth::directory::UserDirectory;
use crate::backend::auth::identity::IdentityVerifier;
use crate::backend::chat::token::TokenIssuer;

/// Application state shared by every handler
///
/// # Fields
///
/// * `identity` - verifies session credentials for the identity layer
/// * `issuer` - mints chat platform tokens
/// * `directory` - user directory sync; `None` without a database
/// * `webhook_secret` - bearer secret expected on identity webhooks
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityVerifier>,
    pub issuer: TokenIssuer,
    pub directory: Option<UserDirectory>,
    pub webhook_secret: Option<String>,
}

impl FromRef<AppState> for Arc<dyn IdentityVerifier> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.identity.clone()
    }
}

impl FromRef<AppState> for TokenIssuer {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.issuer.clone()
    }
}
