//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the client and the backend: wire bodies, identifiers, configuration and
//! common errors.
//!
//! All types are platform-agnostic and designed for JSON serialization.

/// Wire types and identifiers
pub mod types;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use types::{ChatUser, ErrorResponse, TokenResponse, UserId};
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
