//! Middleware Module
//!
//! HTTP middleware applied in front of the handlers.
//!
//! - **`identity`** - attaches a `VerifiedIdentity` to every request
//! - **`auth`** - credential mediator for routes that need a signed-in user
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::{middleware, routing::get, Router};
//! use fullslack::backend::middleware::require_auth;
//!
//! let protected = Router::new()
//!     .route("/api/chat/token", get(get_chat_token))
//!     .route_layer(middleware::from_fn(require_auth));
//! ```

pub mod auth;
pub mod identity;

pub use auth::{require_auth, AuthUser, AuthenticatedUser};
pub use identity::attach_identity;
