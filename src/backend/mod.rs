//! Backend Module
//!
//! Server-side code for fullslack: a thin Axum service that bridges the
//! identity provider and the chat platform.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, app creation
//! - **`routes`** - Router assembly, CORS and tracing
//! - **`middleware`** - Identity layer and credential mediator
//! - **`auth`** - Identity verification, user store, directory sync, webhook
//! - **`chat`** - Chat platform adapter and token issuance
//! - **`error`** - Backend error types and their HTTP mapping
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── middleware/     - Request middleware
//! ├── auth/           - Identity and user directory
//! ├── chat/           - Chat platform and tokens
//! └── error/          - Error types
//! ```
//!
//! # Request Flow
//!
//! 1. The identity layer verifies the session credential and attaches a
//!    `VerifiedIdentity`
//! 2. `require_auth` rejects requests without an authenticated identity
//! 3. `get_chat_token` asks the `TokenIssuer` for a token
//! 4. The client connects to the chat platform with it
//!
//! # Example
//!
//! ```rust,no_run
//! use fullslack::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(&config).await?;
//! let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Server setup and configuration
#[cfg(feature = "ssr")]
pub mod server;

/// Route configuration
#[cfg(feature = "ssr")]
pub mod routes;

/// Chat platform integration
#[cfg(feature = "ssr")]
pub mod chat;

/// Backend error types
#[cfg(feature = "ssr")]
pub mod error;

/// Identity verification and user directory
#[cfg(feature = "ssr")]
pub mod auth;

/// Middleware for request processing
#[cfg(feature = "ssr")]
pub mod middleware;

/// Re-export commonly used types
#[cfg(feature = "ssr")]
pub use server::{create_app, AppState, ServerConfig};
#[cfg(feature = "ssr")]
pub use error::BackendError;
