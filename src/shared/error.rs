//! Errors raised by the shared types
//!
//! Both the backend and the client validate identifiers and payload fields
//! through these types. The backend maps a `SharedError` to
//! `BackendError::InvalidArgument`, or to a 400 where the input came from an
//! external sender.
//!
//! ```rust
//! use fullslack::shared::error::SharedError;
//!
//! let error = SharedError::validation("user_id", "user id must not be empty");
//! assert!(error.to_string().contains("user_id"));
//! ```
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// A field failed validation
    #[error("Validation error in field '{field}': {message}")]
    ValidationError { field: String, message: String },
}

impl SharedError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}
