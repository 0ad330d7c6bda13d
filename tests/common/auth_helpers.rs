//! Authentication test helpers
//!
//! Session credentials as the identity provider would issue them, signed
//! with the shared secret the test server is configured with.

#[cfg(feature = "ssr")]
use chrono::Utc;
#[cfg(feature = "ssr")]
use jsonwebtoken::{encode, EncodingKey, Header};

/// Secret the test identity verifier accepts
pub const IDP_SECRET: &str = "test-idp-secret";

/// Secret the test chat platform signs user tokens with
pub const CHAT_SECRET: &str = "test-chat-secret";

/// Shared secret for identity webhooks
pub const WEBHOOK_SECRET: &str = "whsec_test";

/// A valid session credential for `user_id`
#[cfg(feature = "ssr")]
pub fn session_token(user_id: &str) -> String {
    sign(user_id, Utc::now().timestamp() + 300, IDP_SECRET)
}

/// A session credential that expired an hour ago
#[cfg(feature = "ssr")]
pub fn expired_session_token(user_id: &str) -> String {
    sign(user_id, Utc::now().timestamp() - 3600, IDP_SECRET)
}

/// A session credential signed by someone else
#[cfg(feature = "ssr")]
pub fn forged_session_token(user_id: &str) -> String {
    sign(user_id, Utc::now().timestamp() + 300, "not-the-idp")
}

#[cfg(feature = "ssr")]
fn sign(user_id: &str, exp: i64, secret: &str) -> String {
    let claims = serde_json::json!({ "sub": user_id, "exp": exp });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .expect("Failed to sign test session token")
}
