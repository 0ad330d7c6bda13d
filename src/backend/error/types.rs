/**
 * Backend Error Types
 *
 * This module defines error types specific to the backend server.
 * These errors are used in HTTP handlers and can be converted to HTTP responses.
 *
 * # Error Categories
 *
 * - `Unauthenticated` - no verified identity on the request (401, never retried)
 * - `InvalidArgument` - a caller broke a precondition, e.g. token issuance
 *   without a user id; a programming error surfaced as 500
 * - `Upstream` - the chat platform is unreachable or misconfigured (500)
 * - `TokenIssuance` - the chat platform could not mint a session token (500)
 * - `Store` - the local user store failed (500)
 * - `HandlerError` - request-specific failures with an explicit status
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::chat::platform::PlatformError;
use crate::shared::SharedError;

/// Message returned to callers without a verified identity
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized - you must be logged in";

/// Backend-specific error types
///
/// Each variant maps to an HTTP status code and a JSON body of the form
/// `{ "message": ..., "details": ... }`.
///
/// # Usage
///
/// ```rust
/// use fullslack::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::handler(StatusCode::BAD_REQUEST, "Malformed event");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request carries no verified identity
    #[error("{}", UNAUTHORIZED_MESSAGE)]
    Unauthenticated,

    /// A precondition on an argument was violated
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Chat platform failure
    #[error(transparent)]
    Upstream(#[from] PlatformError),

    /// The chat platform failed to mint a session token
    #[error("Failed to generate chat token: {0}")]
    TokenIssuance(#[source] PlatformError),

    /// User store failure
    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    /// Handler error (e.g., malformed payload, missing configuration)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Create a new invalid-argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `Unauthenticated` - 401 Unauthorized
    /// - `InvalidArgument`, `Upstream`, `TokenIssuance`, `Store` - 500 Internal Server Error
    /// - `HandlerError` - uses the status code from the error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::InvalidArgument(_)
            | Self::Upstream(_)
            | Self::TokenIssuance(_)
            | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::HandlerError { status, .. } => *status,
        }
    }

    /// Get the message exposed to HTTP callers
    pub fn message(&self) -> String {
        match self {
            Self::Unauthenticated => UNAUTHORIZED_MESSAGE.to_string(),
            Self::InvalidArgument(_) => "Invalid argument".to_string(),
            Self::Upstream(_) => "Chat platform request failed".to_string(),
            Self::TokenIssuance(_) => "Failed to generate chat token".to_string(),
            Self::Store(_) => "Database error".to_string(),
            Self::HandlerError { message, .. } => message.clone(),
        }
    }

    /// Get the optional detail exposed to HTTP callers
    ///
    /// Store errors carry no detail so SQL never reaches the response.
    pub fn details(&self) -> Option<String> {
        match self {
            Self::InvalidArgument(message) => Some(message.clone()),
            Self::Upstream(err) | Self::TokenIssuance(err) => Some(err.to_string()),
            _ => None,
        }
    }
}

impl From<SharedError> for BackendError {
    fn from(err: SharedError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}
