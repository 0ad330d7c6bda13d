//! fullslack - Main Library
//!
//! A team messaging backend and client. Sign-in is handled by an external
//! identity provider and chat storage and delivery by a hosted chat
//! platform. This crate is the bridge: the backend turns a verified identity
//! into a chat platform token, and the client uses that token to hold a
//! session open.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between client and backend
//!   - Wire bodies (`TokenResponse`, `ErrorResponse`), `UserId`, `ChatUser`
//!   - `AppConfig` and error types
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP server, identity layer and credential mediator
//!   - Token issuance against the chat platform
//!   - User directory sync driven by identity provider webhooks
//!
//! - **`client`** - Chat session bootstrapper
//!   - Token fetching, connection lifecycle, configuration
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - enables the backend and the server binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use fullslack::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(&config).await?;
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;

/// Chat session client
pub mod client;
