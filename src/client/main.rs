/**
 * fullslack Client Entry Point
 *
 * Signs in with an identity taken from the environment, keeps the chat
 * session open until Ctrl-C and then signs out.
 *
 * # Environment
 *
 * - `FULLSLACK_USER_ID` - identity provider user id
 * - `FULLSLACK_SESSION_TOKEN` - identity provider session credential
 * - `FULLSLACK_USER_NAME`, `FULLSLACK_USERNAME`, `FULLSLACK_USER_EMAIL`,
 *   `FULLSLACK_USER_IMAGE` - optional profile
 */

use std::sync::Arc;

use fullslack::client::{
    ApiClient, ClientError, Config, LocalIdentity, RestConnector, SessionBootstrapper,
};
use fullslack::shared::{ConfigError, UserId};

fn identity_from_env() -> Result<LocalIdentity, ClientError> {
    let user_id = std::env::var("FULLSLACK_USER_ID")
        .map_err(|_| ConfigError::MissingValue("FULLSLACK_USER_ID"))?;
    let user_id = UserId::parse(&user_id).map_err(|e| ConfigError::InvalidValue {
        name: "FULLSLACK_USER_ID",
        message: e.to_string(),
    })?;
    let credential = std::env::var("FULLSLACK_SESSION_TOKEN")
        .map_err(|_| ConfigError::MissingValue("FULLSLACK_SESSION_TOKEN"))?;

    let mut identity = LocalIdentity::new(user_id, credential);
    if let Ok(name) = std::env::var("FULLSLACK_USER_NAME") {
        identity = identity.with_name(name);
    }
    if let Ok(username) = std::env::var("FULLSLACK_USERNAME") {
        identity = identity.with_username(username);
    }
    if let Ok(email) = std::env::var("FULLSLACK_USER_EMAIL") {
        identity = identity.with_email(email);
    }
    if let Ok(image) = std::env::var("FULLSLACK_USER_IMAGE") {
        identity = identity.with_image(image);
    }
    Ok(identity)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config = Config::load()?;
    let connector = RestConnector::new(config.chat_base_url()?, config.chat_api_key()?)?;
    let session = SessionBootstrapper::new(
        Arc::new(ApiClient::new(config.clone())),
        Arc::new(connector),
    );

    let identity = identity_from_env()?;
    let handle = session.sign_in(identity).await?;
    tracing::info!(
        "Connected as {} (connection {}). Press Ctrl-C to sign out.",
        handle.user_id,
        handle.connection_id
    );

    tokio::signal::ctrl_c().await?;
    session.shutdown().await;

    tracing::info!("Signed out");
    Ok(())
}
