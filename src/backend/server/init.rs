/**
 * Server Initialization
 *
 * This module builds the application state from `ServerConfig` and hands it
 * to the router.
 *
 * # Initialization Process
 *
 * 1. Build the chat platform adapter and the identity verifier
 * 2. Load the optional database
 * 3. Assemble `AppState`
 * 4. Create the router
 *
 * A bad chat platform or identity configuration aborts startup. A missing
 * database only disables directory sync.
 */

use std::sync::Arc;

use axum::Router;
use thiserror::Error;

use crate::backend::auth::directory::UserDirectory;
use crate::backend::auth::identity::{IdentityError, IdentityVerifier, JwtIdentityVerifier};
use crate::backend::chat::platform::{ChatPlatform, PlatformError};
use crate::backend::chat::stream::StreamPlatform;
use crate::backend::chat::token::TokenIssuer;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;

/// Errors that prevent the server from starting
#[derive(Debug, Error)]
pub enum InitError {
    #[error("chat platform: {0}")]
    Platform(#[from] PlatformError),
    #[error("identity verifier: {0}")]
    Identity(#[from] IdentityError),
}

/// Create and configure the Axum application
///
/// # Arguments
///
/// * `config` - Server configuration loaded from the environment
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub async fn create_app(config: &ServerConfig) -> Result<Router<()>, InitError> {
    tracing::info!("Initializing fullslack backend server");

    let platform: Arc<dyn ChatPlatform> = Arc::new(StreamPlatform::new(config.stream.clone())?);
    let identity: Arc<dyn IdentityVerifier> =
        Arc::new(JwtIdentityVerifier::new(config.identity.clone())?);

    let db_pool = load_database(config.database_url.as_deref()).await;
    if db_pool.is_some() && config.webhook_secret.is_none() {
        tracing::warn!("WEBHOOK_SECRET not set. Identity webhooks will be refused.");
    }

    let state = build_state(identity, platform, db_pool, config.webhook_secret.clone());
    let app = create_router(state, &config.client_origins);

    tracing::info!("Router configured");
    Ok(app)
}

/// Assemble application state from its collaborators
pub fn build_state(
    identity: Arc<dyn IdentityVerifier>,
    platform: Arc<dyn ChatPlatform>,
    db_pool: Option<sqlx::SqlitePool>,
    webhook_secret: Option<String>,
) -> AppState {
    let directory = db_pool.map(|pool| UserDirectory::new(pool, Arc::clone(&platform)));

    AppState {
        identity,
        issuer: TokenIssuer::new(platform),
        directory,
        webhook_secret,
    }
}
