//! Test server construction
//!
//! Builds the real router around a chosen chat platform, an HS256 identity
//! verifier and an optional in-memory database.

use std::sync::Arc;

use axum_test::TestServer;
use fullslack::backend::auth::{IdentityConfig, IdentityKey, JwtIdentityVerifier};
use fullslack::backend::chat::ChatPlatform;
use fullslack::backend::routes::create_router;
use fullslack::backend::server::build_state;
use fullslack::backend::server::config::connect_database;
use sqlx::SqlitePool;

use super::auth_helpers::IDP_SECRET;

pub struct TestApp {
    pub server: TestServer,
    pub pool: Option<SqlitePool>,
}

/// Builder for a test server
pub struct TestAppBuilder {
    platform: Arc<dyn ChatPlatform>,
    with_database: bool,
    webhook_secret: Option<String>,
}

impl TestAppBuilder {
    pub fn new(platform: Arc<dyn ChatPlatform>) -> Self {
        Self {
            platform,
            with_database: false,
            webhook_secret: None,
        }
    }

    pub fn with_database(mut self) -> Self {
        self.with_database = true;
        self
    }

    pub fn with_webhook_secret(mut self, secret: &str) -> Self {
        self.webhook_secret = Some(secret.to_string());
        self
    }

    pub async fn build(self) -> TestApp {
        let verifier = JwtIdentityVerifier::new(IdentityConfig::new(IdentityKey::Secret(
            IDP_SECRET.to_string(),
        )))
        .expect("Failed to build identity verifier");

        let pool = if self.with_database {
            Some(
                connect_database("sqlite::memory:")
                    .await
                    .expect("Failed to open test database"),
            )
        } else {
            None
        };

        let state = build_state(Arc::new(verifier), self.platform, pool.clone(), self.webhook_secret);
        let router = create_router(state, &["http://localhost:5173".to_string()]);

        TestApp {
            server: TestServer::new(router).expect("Failed to start test server"),
            pool,
        }
    }
}
