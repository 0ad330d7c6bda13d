/**
 * API Routes
 *
 * # Routes
 *
 * ## Chat
 * - `GET /api/chat/token` - Chat platform token (requires authentication)
 *
 * ## Webhooks
 * - `POST /api/webhooks/identity` - Identity provider lifecycle events
 *   (authenticated by shared secret, not by user session)
 */

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::backend::auth::identity_webhook;
use crate::backend::chat::get_chat_token;
use crate::backend::middleware::require_auth;
use crate::backend::server::state::AppState;

/// Configure API routes
///
/// The credential mediator is attached with `route_layer`, so it only runs
/// for requests that matched a protected route.
///
/// # Arguments
///
/// * `router` - The router to add routes to
///
/// # Returns
///
/// Router with API routes configured
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    let protected = Router::new()
        .route("/api/chat/token", get(get_chat_token))
        .route_layer(middleware::from_fn(require_auth));

    router
        .merge(protected)
        .route("/api/webhooks/identity", post(identity_webhook))
}
