// ABOUTME: Storage operations for avatar binaries
// ABOUTME: Full-replace BLOB upserts keyed by owning user id

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::{StorageError, StorageResult};

/// The single avatar image stored for a user
#[derive(Debug, Clone)]
pub struct AvatarAsset {
    pub user_id: i64,
    pub content: Vec<u8>,
    pub content_type: String,
    pub size_bytes: i64,
    pub updated_at: String,
}

/// Persistence contract for avatar binaries
#[async_trait]
pub trait AvatarStore: Send + Sync {
    /// Replace the stored avatar for the user; idempotent
    async fn put(&self, user_id: i64, content: &[u8], content_type: &str) -> StorageResult<()>;

    /// Complete current bytes, or `None` if the user has no avatar
    async fn get(&self, user_id: i64) -> StorageResult<Option<AvatarAsset>>;
}

pub struct SqliteAvatarStore {
    pool: SqlitePool,
}

impl SqliteAvatarStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_asset(&self, row: &sqlx::sqlite::SqliteRow) -> StorageResult<AvatarAsset> {
        Ok(AvatarAsset {
            user_id: row.try_get("user_id")?,
            content: row.try_get("content")?,
            content_type: row.try_get("content_type")?,
            size_bytes: row.try_get("size_bytes")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl AvatarStore for SqliteAvatarStore {
    async fn put(&self, user_id: i64, content: &[u8], content_type: &str) -> StorageResult<()> {
        debug!(
            "Storing avatar for user: {} ({} bytes)",
            user_id,
            content.len()
        );

        // Single-statement replace: readers see the old image in full or the
        // new image in full, never a truncation.
        sqlx::query(
            r#"
            INSERT INTO user_avatars (user_id, content, content_type, size_bytes)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                content = excluded.content,
                content_type = excluded.content_type,
                size_bytes = excluded.size_bytes,
                updated_at = datetime('now', 'utc')
            "#,
        )
        .bind(user_id)
        .bind(content)
        .bind(content_type)
        .bind(content.len() as i64)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(())
    }

    async fn get(&self, user_id: i64) -> StorageResult<Option<AvatarAsset>> {
        debug!("Fetching avatar for user: {}", user_id);

        let row = sqlx::query(
            "SELECT user_id, content, content_type, size_bytes, updated_at FROM user_avatars WHERE user_id = ?",
        )
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.map(|row| self.row_to_asset(&row)).transpose()
    }
}
