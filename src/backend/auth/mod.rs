//! Authentication Module
//!
//! Sign-in belongs to the external identity provider. This module verifies
//! the provider's session credentials and keeps a local mirror of its users.
//!
//! - **`identity`** - `IdentityVerifier` trait and the JWT verifier
//! - **`users`** - user model and database operations
//! - **`directory`** - user directory sync (local store + chat platform)
//! - **`handlers`** - identity provider webhook
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── identity.rs     - Session credential verification
//! ├── users.rs        - User model and database operations
//! ├── directory.rs    - Directory sync
//! └── handlers/       - HTTP handlers
//! ```

/// Session credential verification
pub mod identity;

/// User data model and database operations
pub mod users;

/// Local store and chat platform mirror
pub mod directory;

/// HTTP handlers for identity provider events
pub mod handlers;

// Re-export commonly used types and handlers
pub use directory::UserDirectory;
pub use handlers::identity_webhook;
pub use identity::{
    IdentityConfig, IdentityError, IdentityKey, IdentityVerifier, JwtIdentityVerifier,
    VerifiedIdentity,
};
pub use users::{User, UserProfile};
