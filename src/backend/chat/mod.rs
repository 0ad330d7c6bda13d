//! Chat Backend Module
//!
//! Everything the backend does with the external chat platform:
//!
//! - **`platform`** - the `ChatPlatform` capability trait and its errors
//! - **`stream`** - REST adapter for the hosted chat service
//! - **`token`** - the stateless `TokenIssuer`
//! - **`handlers`** - `GET /api/chat/token`
//!
//! Message storage, delivery and presence stay on the platform; clients talk
//! to it directly once they hold a token.

/// Chat platform capability trait
pub mod platform;

/// Hosted chat service adapter
pub mod stream;

/// Token issuance
pub mod token;

/// HTTP handlers
pub mod handlers;

/// Re-export commonly used types
pub use platform::{ChannelRef, ChatPlatform, PlatformError};
pub use stream::{StreamConfig, StreamPlatform};
pub use token::TokenIssuer;
pub use handlers::get_chat_token;
