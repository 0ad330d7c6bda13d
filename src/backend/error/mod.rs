//! Backend Error Module
//!
//! This module defines error types specific to the backend server.
//! These errors are used in handlers and middleware and convert to JSON
//! HTTP responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - IntoResponse implementation
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::{BackendError, UNAUTHORIZED_MESSAGE};
