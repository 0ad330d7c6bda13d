/**
 * Identity Layer
 *
 * Runs on every request. Reads the session credential, asks the configured
 * `IdentityVerifier` about it and stores the outcome as a `VerifiedIdentity`
 * in the request extensions. It never rejects: routes that need a signed-in
 * user put `require_auth` in front of their handler.
 *
 * The credential is taken from `Authorization: Bearer <jwt>`, falling back to
 * the identity provider's `__session` cookie.
 */

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, COOKIE},
        HeaderMap,
    },
    middleware::Next,
    response::Response,
};

use crate::backend::auth::identity::{IdentityVerifier, VerifiedIdentity};

/// Cookie the identity provider uses for same-site sessions
pub const SESSION_COOKIE: &str = "__session";

/// Attach the verification result to the request
pub async fn attach_identity(
    State(verifier): State<Arc<dyn IdentityVerifier>>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = match session_credential(request.headers()) {
        Some(credential) => match verifier.verify(&credential).await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::debug!("Session credential rejected: {:?}", e);
                VerifiedIdentity::anonymous()
            }
        },
        None => VerifiedIdentity::anonymous(),
    };

    request.extensions_mut().insert(identity);
    next.run(request).await
}

/// Extract the session credential from request headers
pub fn session_credential(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
