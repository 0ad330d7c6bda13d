//! Chat token API integration tests
//!
//! `GET /api/chat/token` through the full router: identity layer, credential
//! mediator and token issuer.

mod common;

#[cfg(feature = "ssr")]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use axum::http::{header, HeaderValue, StatusCode};
    use fullslack::backend::chat::stream::UserTokenClaims;
    use fullslack::backend::chat::{StreamConfig, StreamPlatform};
    use fullslack::shared::{ErrorResponse, TokenResponse};
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
    use pretty_assertions::assert_eq;

    use crate::common::auth_helpers::{
        expired_session_token, forged_session_token, session_token, CHAT_SECRET,
    };
    use crate::common::fake_platform::FakePlatform;
    use crate::common::server::TestAppBuilder;

    fn unauthorized_body() -> serde_json::Value {
        serde_json::json!({ "message": "Unauthorized - you must be logged in" })
    }

    #[tokio::test]
    async fn test_missing_credential_is_rejected_before_issuer() {
        let platform = Arc::new(FakePlatform::default());
        let app = TestAppBuilder::new(platform.clone()).build().await;

        let response = app.server.get("/api/chat/token").await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<serde_json::Value>(), unauthorized_body());
        assert_eq!(platform.token_calls(), 0);
    }

    #[tokio::test]
    async fn test_forged_credential_is_rejected() {
        let platform = Arc::new(FakePlatform::default());
        let app = TestAppBuilder::new(platform.clone()).build().await;

        let response = app
            .server
            .get("/api/chat/token")
            .authorization_bearer(forged_session_token("u_123"))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<serde_json::Value>(), unauthorized_body());
        assert_eq!(platform.token_calls(), 0);
    }

    #[tokio::test]
    async fn test_expired_credential_is_rejected() {
        let platform = Arc::new(FakePlatform::default());
        let app = TestAppBuilder::new(platform.clone()).build().await;

        let response = app
            .server
            .get("/api/chat/token")
            .authorization_bearer(expired_session_token("u_123"))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(platform.token_calls(), 0);
    }

    #[tokio::test]
    async fn test_token_is_scoped_to_caller() {
        let platform = StreamPlatform::new(StreamConfig::new("key", CHAT_SECRET)).unwrap();
        let app = TestAppBuilder::new(Arc::new(platform)).build().await;

        let response = app
            .server
            .get("/api/chat/token")
            .authorization_bearer(session_token("u_123"))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: TokenResponse = response.json();
        assert!(!body.token.is_empty());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        let claims = decode::<UserTokenClaims>(
            &body.token,
            &DecodingKey::from_secret(CHAT_SECRET.as_bytes()),
            &validation,
        )
        .unwrap()
        .claims;
        assert_eq!(claims.user_id, "u_123");
    }

    #[tokio::test]
    async fn test_session_cookie_is_accepted() {
        let platform = Arc::new(FakePlatform::default());
        let app = TestAppBuilder::new(platform.clone()).build().await;

        let cookie = format!("__session={}", session_token("u_123"));
        let response = app
            .server
            .get("/api/chat/token")
            .add_header(header::COOKIE, HeaderValue::from_str(&cookie).unwrap())
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<TokenResponse>().token, "chat-token-u_123-0");
        assert_eq!(platform.token_calls(), 1);
    }

    #[tokio::test]
    async fn test_each_request_mints_a_token() {
        let platform = Arc::new(FakePlatform::default());
        let app = TestAppBuilder::new(platform.clone()).build().await;
        let credential = session_token("u_123");

        for _ in 0..3 {
            app.server
                .get("/api/chat/token")
                .authorization_bearer(credential.clone())
                .await
                .assert_status_ok();
        }

        assert_eq!(platform.token_calls(), 3);
    }

    #[tokio::test]
    async fn test_platform_failure_is_500_with_details() {
        let platform = Arc::new(FakePlatform::default());
        platform.fail_tokens.store(true, Ordering::SeqCst);
        let app = TestAppBuilder::new(platform.clone()).build().await;

        let response = app
            .server
            .get("/api/chat/token")
            .authorization_bearer(session_token("u_123"))
            .await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorResponse = response.json();
        assert_eq!(body.message, "Failed to generate chat token");
        assert!(body.details.unwrap().contains("chat platform unavailable"));
    }

    #[tokio::test]
    async fn test_health_and_not_found() {
        let app = TestAppBuilder::new(Arc::new(FakePlatform::default())).build().await;

        let health = app.server.get("/health").await;
        health.assert_status_ok();
        health.assert_text("ok");

        let missing = app.server.get("/api/nope").await;
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(missing.json::<ErrorResponse>().message, "Not found");
    }
}
