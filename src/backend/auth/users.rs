/**
 * User Model and Database Operations
 *
 * This module handles the local user identity record. The identity provider
 * is the source of truth; rows here mirror it so the chat platform and the
 * backend agree on who each participant is.
 *
 * Uniqueness is enforced by the schema (`external_id` and `email`), and
 * `upsert_user` relies on SQLite's atomic `INSERT ... ON CONFLICT` instead
 * of read-then-write.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Profile data received from the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Identity provider user id
    pub external_id: String,
    pub email: String,
    pub display_name: String,
    pub avatar_url: String,
}

/// User struct representing a user in the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Local surrogate id (UUID)
    pub id: String,
    /// Identity provider user id (unique)
    pub external_id: String,
    /// User email address (unique)
    pub email: String,
    pub display_name: String,
    pub avatar_url: String,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp
    pub updated_at: DateTime<Utc>,
}

/// Outcome of an upsert
#[derive(Debug, Clone)]
pub struct UpsertedUser {
    pub user: User,
    /// True when the row did not exist before
    pub created: bool,
}

/// Create a user, or update the existing row with the same external id
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `profile` - Profile received from the identity provider
///
/// # Returns
/// The stored row and whether it was newly created
pub async fn upsert_user(pool: &SqlitePool, profile: &UserProfile) -> Result<UpsertedUser, sqlx::Error> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now();

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, external_id, email, display_name, avatar_url, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
        ON CONFLICT (external_id) DO UPDATE SET
            email = excluded.email,
            display_name = excluded.display_name,
            avatar_url = excluded.avatar_url,
            updated_at = excluded.updated_at
        RETURNING id, external_id, email, display_name, avatar_url, created_at, updated_at
        "#
    )
    .bind(&id)
    .bind(&profile.external_id)
    .bind(&profile.email)
    .bind(&profile.display_name)
    .bind(&profile.avatar_url)
    .bind(now)
    .fetch_one(pool)
    .await?;

    let created = user.id == id;
    Ok(UpsertedUser { user, created })
}

/// Get user by identity provider id
pub async fn get_user_by_external_id(
    pool: &SqlitePool,
    external_id: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, external_id, email, display_name, avatar_url, created_at, updated_at
        FROM users
        WHERE external_id = ?1
        "#
    )
    .bind(external_id)
    .fetch_optional(pool)
    .await
}

/// Delete a user by identity provider id
///
/// # Returns
/// `true` if a row was removed, `false` if there was nothing to delete
pub async fn delete_user_by_external_id(
    pool: &SqlitePool,
    external_id: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE external_id = ?1")
        .bind(external_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Count stored users
pub async fn count_users(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::server::config::connect_database;

    async fn pool() -> SqlitePool {
        connect_database("sqlite::memory:").await.unwrap()
    }

    fn profile(external_id: &str, email: &str) -> UserProfile {
        UserProfile {
            external_id: external_id.to_string(),
            email: email.to_string(),
            display_name: "Ada Lovelace".to_string(),
            avatar_url: "https://img.example/ada.png".to_string(),
        }
    }

    #[tokio::test]
    async fn test_upsert_twice_keeps_one_row() {
        let pool = pool().await;

        let first = upsert_user(&pool, &profile("u_1", "ada@example.com")).await.unwrap();
        assert!(first.created);

        let mut updated = profile("u_1", "ada@example.com");
        updated.display_name = "Ada King".to_string();
        let second = upsert_user(&pool, &updated).await.unwrap();
        assert!(!second.created);
        assert_eq!(second.user.id, first.user.id);
        assert_eq!(second.user.display_name, "Ada King");

        assert_eq!(count_users(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let pool = pool().await;
        upsert_user(&pool, &profile("u_1", "ada@example.com")).await.unwrap();

        let result = upsert_user(&pool, &profile("u_2", "ada@example.com")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_not_an_error() {
        let pool = pool().await;
        assert!(!delete_user_by_external_id(&pool, "ghost").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_user_by_external_id() {
        let pool = pool().await;
        upsert_user(&pool, &profile("u_1", "ada@example.com")).await.unwrap();

        let user = get_user_by_external_id(&pool, "u_1").await.unwrap().unwrap();
        assert_eq!(user.email, "ada@example.com");
        assert!(get_user_by_external_id(&pool, "u_2").await.unwrap().is_none());
    }
}
