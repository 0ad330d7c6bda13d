//! Common test utilities and helpers
//!
//! - Session credential helpers for the identity layer
//! - A recording chat platform double
//! - Test server construction

#![allow(dead_code)]

pub mod auth_helpers;
#[cfg(feature = "ssr")]
pub mod fake_platform;
#[cfg(feature = "ssr")]
pub mod server;

use std::time::Duration;

/// Poll `condition` until it holds or two seconds pass
pub async fn wait_for<F>(mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
