/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Layers
 *
 * Applied outermost first:
 * 1. CORS for the configured client origins, with credentials
 * 2. Request tracing
 * 3. Identity layer, which attaches a `VerifiedIdentity` to every request
 *
 * Protected routes add the credential mediator on top of these in
 * `api_routes`.
 */

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method, StatusCode,
    },
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::backend::error::BackendError;
use crate::backend::middleware::attach_identity;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Application state
/// * `client_origins` - Origins allowed to call the API from a browser
///
/// # Routes
///
/// - `GET /health` - Liveness check
/// - `GET /api/chat/token` - Chat token for the signed-in user
/// - `POST /api/webhooks/identity` - Identity provider events
///
/// Unknown routes get a JSON 404.
pub fn create_router(app_state: AppState, client_origins: &[String]) -> Router<()> {
    let router = Router::new().route("/health", get(health));

    let router = configure_api_routes(router);

    let router = router.fallback(not_found);

    router
        .layer(middleware::from_fn_with_state(app_state.clone(), attach_identity))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(client_origins))
        .with_state(app_state)
}

async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> BackendError {
    BackendError::handler(StatusCode::NOT_FOUND, "Not found")
}

/// CORS for browser clients that send the session cookie
pub fn cors_layer(client_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = client_origins
        .iter()
        .filter(|origin| {
            let wildcard = origin.as_str() == "*";
            if wildcard {
                tracing::warn!("Ignoring wildcard CORS origin; credentials need explicit origins");
            }
            !wildcard
        })
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin {}: {:?}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
}
