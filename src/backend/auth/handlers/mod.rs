//! Identity Webhook Handlers
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports
//! ├── types.rs    - Event payloads and acknowledgement
//! └── webhook.rs  - POST /api/webhooks/identity
//! ```

/// Event payloads
pub mod types;

/// Webhook handler
pub mod webhook;

pub use types::{WebhookAck, WebhookEvent};
pub use webhook::{identity_webhook, WebhookState};
