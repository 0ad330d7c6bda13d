/**
 * Chat Token Handler
 *
 * `GET /api/chat/token` hands the signed-in user a chat platform token. The
 * route sits behind the credential mediator, so by the time this handler
 * runs the request carries an `AuthenticatedUser`.
 *
 * # Responses
 *
 * - `200 { "token": "..." }`
 * - `401 { "message": "Unauthorized - you must be logged in" }`
 * - `500 { "message": ..., "details": ... }` when the platform fails
 */

use axum::{extract::State, response::Json};

use crate::backend::chat::token::TokenIssuer;
use crate::backend::error::BackendError;
use crate::backend::middleware::auth::AuthUser;
use crate::shared::TokenResponse;

/// Issue a chat token for the authenticated caller
pub async fn get_chat_token(
    State(issuer): State<TokenIssuer>,
    AuthUser(user): AuthUser,
) -> Result<Json<TokenResponse>, BackendError> {
    tracing::debug!(user_id = %user.user_id, "Chat token requested");

    let token = issuer.issue_token(Some(&user.user_id)).await?;
    Ok(Json(TokenResponse { token }))
}
