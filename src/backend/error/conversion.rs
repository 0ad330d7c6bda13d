/**
 * Error Conversion
 *
 * `IntoResponse` for backend errors, so handlers and middleware can return
 * them directly.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "message": "Chat platform request failed",
 *   "details": "chat platform returned 503: ..."
 * }
 * ```
 *
 * `details` is omitted when the error has none.
 */

use axum::{
    response::{IntoResponse, Json, Response},
};

use crate::backend::error::types::BackendError;
use crate::shared::ErrorResponse;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "Request failed: {}", self);
        } else {
            tracing::debug!(status = status.as_u16(), "Request rejected: {}", self);
        }

        let mut body = ErrorResponse::new(self.message());
        if let Some(details) = self.details() {
            body = body.with_details(details);
        }

        (status, Json(body)).into_response()
    }
}
