/**
 * Authentication Middleware
 *
 * The credential mediator. Routes that require a signed-in user are wrapped
 * with `require_auth`, which reads the `VerifiedIdentity` left by the
 * identity layer and rejects the request before it reaches the handler
 * unless that identity is authenticated and names a user.
 *
 * Fails closed: a missing identity counts as unauthenticated.
 */

use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::backend::auth::identity::VerifiedIdentity;
use crate::backend::error::BackendError;

/// Authenticated user attached to request extensions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

/// Credential mediator
///
/// This middleware:
/// 1. Reads the `VerifiedIdentity` attached by the identity layer
/// 2. Rejects with 401 unless it is authenticated with a non-empty user id
/// 3. Attaches `AuthenticatedUser` to request extensions for handlers
pub async fn require_auth(mut request: Request, next: Next) -> Result<Response, BackendError> {
    let user = authenticated_user(request.extensions().get::<VerifiedIdentity>())
        .ok_or_else(|| {
            tracing::warn!(path = %request.uri().path(), "Rejected unauthenticated request");
            BackendError::Unauthenticated
        })?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Decide whether an identity may pass
pub fn authenticated_user(identity: Option<&VerifiedIdentity>) -> Option<AuthenticatedUser> {
    let identity = identity.filter(|i| i.is_authenticated)?;
    let user_id = identity.user_id.as_deref().map(str::trim).filter(|id| !id.is_empty())?;
    Some(AuthenticatedUser {
        user_id: user_id.to_string(),
    })
}

/// Axum extractor for the authenticated user
///
/// Handlers behind `require_auth` take this as a parameter. Used anywhere
/// else it rejects with the same 401.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::Unauthenticated
            })?;

        Ok(AuthUser(user))
    }
}
