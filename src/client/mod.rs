//! Client Module
//!
//! The client half of fullslack: fetch a chat token from the backend, then
//! hold a direct connection to the chat platform for the signed-in user.
//!
//! - **`config`** - server and chat platform settings (TOML file + environment)
//! - **`api`** - backend client and the `TokenSource` trait
//! - **`connector`** - `ChatConnector` trait and the REST connector
//! - **`session`** - `SessionBootstrapper`, the connection lifecycle
//! - **`error`** - `ClientError`

pub mod api;
pub mod config;
pub mod connector;
pub mod error;
pub mod session;

pub use api::{ApiClient, TokenSource};
pub use config::Config;
pub use connector::{ChatConnector, RestConnector, SessionHandle};
pub use error::ClientError;
pub use session::{LocalIdentity, SessionBootstrapper, SessionState};
