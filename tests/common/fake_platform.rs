//! Recording chat platform double
//!
//! Counts every call so tests can assert that rejected requests never
//! reached the platform.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use fullslack::backend::chat::{ChannelRef, ChatPlatform, PlatformError};
use fullslack::shared::ChatUser;

#[derive(Default)]
pub struct FakePlatform {
    pub token_calls: AtomicUsize,
    pub upserts: Mutex<Vec<ChatUser>>,
    pub deletes: Mutex<Vec<String>>,
    pub added: Mutex<Vec<(String, String)>>,
    pub channels: Vec<ChannelRef>,
    pub fail_tokens: AtomicBool,
}

impl FakePlatform {
    pub fn with_channels(channels: Vec<ChannelRef>) -> Self {
        Self {
            channels,
            ..Default::default()
        }
    }

    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    pub fn upsert_count(&self) -> usize {
        self.upserts.lock().unwrap().len()
    }

    pub fn total_calls(&self) -> usize {
        self.token_calls()
            + self.upsert_count()
            + self.deletes.lock().unwrap().len()
            + self.added.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatPlatform for FakePlatform {
    async fn upsert_user(&self, user: &ChatUser) -> Result<(), PlatformError> {
        self.upserts.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), PlatformError> {
        self.deletes.lock().unwrap().push(user_id.to_string());
        Ok(())
    }

    async fn create_token(&self, user_id: &str) -> Result<String, PlatformError> {
        let n = self.token_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_tokens.load(Ordering::SeqCst) {
            return Err(PlatformError::Status {
                status: 503,
                body: "chat platform unavailable".to_string(),
            });
        }
        Ok(format!("chat-token-{}-{}", user_id, n))
    }

    async fn query_public_channels(&self) -> Result<Vec<ChannelRef>, PlatformError> {
        Ok(self.channels.clone())
    }

    async fn add_members(
        &self,
        channel: &ChannelRef,
        user_ids: &[String],
    ) -> Result<(), PlatformError> {
        let mut added = self.added.lock().unwrap();
        for id in user_ids {
            added.push((channel.id.clone(), id.clone()));
        }
        Ok(())
    }
}
