/**
 * Identity Webhook Handler
 *
 * `POST /api/webhooks/identity` receives user lifecycle events from the
 * identity provider and applies them to the user directory.
 *
 * # Authentication
 *
 * The sender presents `Authorization: Bearer <WEBHOOK_SECRET>`. The secret is
 * checked before the body is parsed.
 *
 * # Responses
 *
 * - `200 { "status": "processed" }` - event applied
 * - `200 { "status": "ignored" }` - event type not handled
 * - `400` - malformed payload
 * - `401` - missing or wrong secret
 * - `503` - no secret or no database configured
 * - `500` - store or platform failure; the sender is expected to retry
 */

use axum::{
    body::Bytes,
    extract::{FromRef, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::Json,
};

use crate::backend::auth::directory::UserDirectory;
use crate::backend::auth::handlers::types::{
    DeletedUserData, UserEventData, WebhookAck, WebhookEvent, USER_CREATED, USER_DELETED,
    USER_UPDATED,
};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Slice of application state the webhook needs
#[derive(Clone)]
pub struct WebhookState {
    pub directory: Option<UserDirectory>,
    pub secret: Option<String>,
}

impl FromRef<AppState> for WebhookState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            directory: state.directory.clone(),
            secret: state.webhook_secret.clone(),
        }
    }
}

/// Handle an identity provider lifecycle event
///
/// # Arguments
///
/// * `State(state)` - Directory and shared secret
/// * `headers` - Request headers carrying the bearer secret
/// * `body` - Raw JSON event
///
/// # Returns
///
/// JSON acknowledgement, or a `BackendError` mapped to its status code
pub async fn identity_webhook(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, BackendError> {
    let secret = state.secret.as_deref().ok_or_else(|| {
        tracing::warn!("Identity webhook called but WEBHOOK_SECRET is not configured");
        BackendError::handler(StatusCode::SERVICE_UNAVAILABLE, "Webhook not configured")
    })?;

    let presented = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .unwrap_or_default();
    if !secrets_match(presented, secret) {
        tracing::warn!("Identity webhook rejected: bad secret");
        return Err(BackendError::Unauthenticated);
    }

    let directory = state.directory.as_ref().ok_or_else(|| {
        tracing::warn!("Identity webhook called but no database is configured");
        BackendError::handler(StatusCode::SERVICE_UNAVAILABLE, "Database not configured")
    })?;

    let event: WebhookEvent = serde_json::from_slice(&body).map_err(bad_request)?;
    tracing::debug!(event_type = %event.event_type, "Identity webhook received");

    match event.event_type.as_str() {
        USER_CREATED | USER_UPDATED => {
            let data: UserEventData = serde_json::from_value(event.data).map_err(bad_request)?;
            let profile = data.into_profile().map_err(bad_request)?;
            directory.upsert(&profile).await?;
        }
        USER_DELETED => {
            let data: DeletedUserData = serde_json::from_value(event.data).map_err(bad_request)?;
            if data.id.trim().is_empty() {
                return Err(BackendError::handler(StatusCode::BAD_REQUEST, "Missing user id"));
            }
            directory.remove(&data.id).await?;
        }
        other => {
            tracing::debug!("Ignoring identity event type {}", other);
            return Ok(Json(WebhookAck::ignored()));
        }
    }

    Ok(Json(WebhookAck::processed()))
}

fn bad_request(err: impl std::fmt::Display) -> BackendError {
    BackendError::handler(StatusCode::BAD_REQUEST, format!("Malformed event: {}", err))
}

/// Compare without short-circuiting on the first differing byte
fn secrets_match(presented: &str, expected: &str) -> bool {
    let (a, b) = (presented.as_bytes(), expected.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
