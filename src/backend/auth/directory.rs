/**
 * User Directory Sync
 *
 * Keeps the local user record and the chat platform's user registry in step
 * with the identity provider. The local store is written first; the platform
 * mirror follows and its failures are surfaced to the caller so the webhook
 * sender retries the event.
 *
 * Joining public channels follows every successful platform upsert, so a
 * user whose first mirror attempt failed still joins when the event is
 * retried. Adding an existing member is a no-op on the platform. The join
 * runs on a background task and only ever logs.
 */

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::backend::auth::users::{self, UpsertedUser, UserProfile};
use crate::backend::chat::platform::ChatPlatform;
use crate::backend::error::BackendError;
use crate::shared::ChatUser;

/// Local user store plus the platform mirror
#[derive(Clone)]
pub struct UserDirectory {
    pool: SqlitePool,
    platform: Arc<dyn ChatPlatform>,
}

impl UserDirectory {
    pub fn new(pool: SqlitePool, platform: Arc<dyn ChatPlatform>) -> Self {
        Self { pool, platform }
    }

    /// Create or update a user locally and on the platform
    ///
    /// # Arguments
    /// * `profile` - Profile received from the identity provider
    ///
    /// # Returns
    /// The stored user and whether it was newly created
    ///
    /// # Errors
    /// * `BackendError::Store` - the local upsert failed; the platform is not called
    /// * `BackendError::Upstream` - the platform rejected the mirrored user
    pub async fn upsert(&self, profile: &UserProfile) -> Result<UpsertedUser, BackendError> {
        let upserted = users::upsert_user(&self.pool, profile).await?;

        let chat_user = ChatUser {
            id: profile.external_id.clone(),
            name: profile.display_name.clone(),
            image: non_empty(&profile.avatar_url),
        };
        self.platform.upsert_user(&chat_user).await?;

        tracing::info!(
            user_id = %profile.external_id,
            created = upserted.created,
            "User synced to chat platform"
        );

        let platform = Arc::clone(&self.platform);
        let user_id = profile.external_id.clone();
        tokio::spawn(async move {
            join_public_channels(platform.as_ref(), &user_id).await;
        });

        Ok(upserted)
    }

    /// Delete a user locally and on the platform
    ///
    /// Removing a user that exists in neither place succeeds.
    ///
    /// # Returns
    /// `true` if a local row was removed
    pub async fn remove(&self, user_id: &str) -> Result<bool, BackendError> {
        let removed = users::delete_user_by_external_id(&self.pool, user_id).await?;
        self.platform.delete_user(user_id).await?;

        tracing::info!(user_id = %user_id, removed, "User removed from directory");
        Ok(removed)
    }
}

/// Add `user_id` to every discoverable channel
///
/// Failures are logged and swallowed; a channel that rejects the member does
/// not stop the others.
///
/// # Returns
/// The number of channels the user was added to
pub async fn join_public_channels(platform: &dyn ChatPlatform, user_id: &str) -> usize {
    let channels = match platform.query_public_channels().await {
        Ok(channels) => channels,
        Err(e) => {
            tracing::warn!("Failed to list public channels for {}: {:?}", user_id, e);
            return 0;
        }
    };

    let members = [user_id.to_string()];
    let mut joined = 0;
    for channel in &channels {
        match platform.add_members(channel, &members).await {
            Ok(()) => joined += 1,
            Err(e) => tracing::warn!(
                "Failed to add {} to channel {}:{}: {:?}",
                user_id,
                channel.kind,
                channel.id,
                e
            ),
        }
    }

    tracing::debug!(user_id = %user_id, joined, total = channels.len(), "Joined public channels");
    joined
}

fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::chat::platform::{ChannelRef, PlatformError};
    use crate::backend::server::config::connect_database;
    use crate::backend::auth::users::count_users;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPlatform {
        upserts: Mutex<Vec<ChatUser>>,
        deletes: Mutex<Vec<String>>,
        added: Mutex<Vec<(String, String)>>,
        channels: Vec<ChannelRef>,
        reject_channel: Option<String>,
        failing_upserts: AtomicUsize,
    }

    #[async_trait]
    impl ChatPlatform for RecordingPlatform {
        async fn upsert_user(&self, user: &ChatUser) -> Result<(), PlatformError> {
            if self
                .failing_upserts
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(PlatformError::Status { status: 503, body: "down".to_string() });
            }
            self.upserts.lock().unwrap().push(user.clone());
            Ok(())
        }

        async fn delete_user(&self, user_id: &str) -> Result<(), PlatformError> {
            self.deletes.lock().unwrap().push(user_id.to_string());
            Ok(())
        }

        async fn create_token(&self, user_id: &str) -> Result<String, PlatformError> {
            Ok(format!("token-{}", user_id))
        }

        async fn query_public_channels(&self) -> Result<Vec<ChannelRef>, PlatformError> {
            Ok(self.channels.clone())
        }

        async fn add_members(
            &self,
            channel: &ChannelRef,
            user_ids: &[String],
        ) -> Result<(), PlatformError> {
            if self.reject_channel.as_deref() == Some(channel.id.as_str()) {
                return Err(PlatformError::Status { status: 403, body: "frozen".to_string() });
            }
            for id in user_ids {
                self.added.lock().unwrap().push((channel.id.clone(), id.clone()));
            }
            Ok(())
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            external_id: "u_1".to_string(),
            email: "ada@example.com".to_string(),
            display_name: "Ada Lovelace".to_string(),
            avatar_url: String::new(),
        }
    }

    #[tokio::test]
    async fn test_upsert_mirrors_to_platform() {
        let platform = Arc::new(RecordingPlatform::default());
        let pool = connect_database("sqlite::memory:").await.unwrap();
        let directory = UserDirectory::new(pool.clone(), platform.clone());

        let upserted = directory.upsert(&profile()).await.unwrap();
        assert!(upserted.created);

        let upserts = platform.upserts.lock().unwrap().clone();
        assert_eq!(upserts.len(), 1);
        assert_eq!(upserts[0].id, "u_1");
        assert_eq!(upserts[0].name, "Ada Lovelace");
        assert_eq!(upserts[0].image, None);
    }

    #[tokio::test]
    async fn test_platform_failure_is_surfaced() {
        let platform = Arc::new(RecordingPlatform {
            failing_upserts: AtomicUsize::new(1),
            ..Default::default()
        });
        let pool = connect_database("sqlite::memory:").await.unwrap();
        let directory = UserDirectory::new(pool, platform);

        let result = directory.upsert(&profile()).await;
        assert!(matches!(result, Err(BackendError::Upstream(_))));
    }

    #[tokio::test]
    async fn test_retry_after_platform_failure_joins_channels() {
        let platform = Arc::new(RecordingPlatform {
            channels: vec![ChannelRef::new("messaging", "general")],
            failing_upserts: AtomicUsize::new(1),
            ..Default::default()
        });
        let pool = connect_database("sqlite::memory:").await.unwrap();
        let directory = UserDirectory::new(pool.clone(), platform.clone());

        assert!(matches!(directory.upsert(&profile()).await, Err(BackendError::Upstream(_))));
        assert_eq!(count_users(&pool).await.unwrap(), 1);

        let retried = directory.upsert(&profile()).await.unwrap();
        assert!(!retried.created);

        let joined = eventually(|| platform.added.lock().unwrap().len() == 1).await;
        assert!(joined, "retried user never joined the public channel");
        assert_eq!(
            platform.added.lock().unwrap()[0],
            ("general".to_string(), "u_1".to_string())
        );
    }

    async fn eventually<F: FnMut() -> bool>(mut condition: F) -> bool {
        for _ in 0..200 {
            if condition() {
                return true;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        condition()
    }

    #[tokio::test]
    async fn test_remove_unknown_user_succeeds() {
        let platform = Arc::new(RecordingPlatform::default());
        let pool = connect_database("sqlite::memory:").await.unwrap();
        let directory = UserDirectory::new(pool, platform.clone());

        assert!(!directory.remove("ghost").await.unwrap());
        assert_eq!(platform.deletes.lock().unwrap().as_slice(), ["ghost".to_string()]);
    }

    #[tokio::test]
    async fn test_join_public_channels_skips_failures() {
        let platform = RecordingPlatform {
            channels: vec![
                ChannelRef::new("messaging", "general"),
                ChannelRef::new("messaging", "frozen"),
                ChannelRef::new("messaging", "random"),
            ],
            reject_channel: Some("frozen".to_string()),
            ..Default::default()
        };

        let joined = join_public_channels(&platform, "u_1").await;
        assert_eq!(joined, 2);

        let added = platform.added.lock().unwrap().clone();
        assert_eq!(
            added,
            vec![
                ("general".to_string(), "u_1".to_string()),
                ("random".to_string(), "u_1".to_string()),
            ]
        );
    }
}
