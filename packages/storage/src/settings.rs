// ABOUTME: Storage operations for user settings records
// ABOUTME: JSON merge-patch upserts keyed by user id

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::{StorageError, StorageResult};

/// A user's settings record. `fields` is an open mapping of preference keys
/// to values; the store returns it exactly as last written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRecord {
    pub user_id: i64,
    pub fields: Map<String, Value>,
    pub updated_at: Option<String>,
}

impl SettingsRecord {
    /// The well-defined record for a user who has never written settings
    pub fn empty(user_id: i64) -> Self {
        Self {
            user_id,
            fields: Map::new(),
            updated_at: None,
        }
    }
}

/// Persistence contract for settings records
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Merge the supplied fields into the stored record, creating it if absent
    async fn upsert(&self, user_id: i64, fields: &Map<String, Value>) -> StorageResult<()>;

    /// Current record for the user, or the empty default if none exists
    async fn get(&self, user_id: i64) -> StorageResult<SettingsRecord>;
}

pub struct SqliteSettingsStore {
    pool: SqlitePool,
}

impl SqliteSettingsStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_record(&self, row: &sqlx::sqlite::SqliteRow) -> StorageResult<SettingsRecord> {
        let fields: String = row.try_get("fields")?;
        Ok(SettingsRecord {
            user_id: row.try_get("user_id")?,
            fields: serde_json::from_str(&fields)?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl SettingsStore for SqliteSettingsStore {
    async fn upsert(&self, user_id: i64, fields: &Map<String, Value>) -> StorageResult<()> {
        debug!("Upserting settings for user: {}", user_id);

        let patch = serde_json::to_string(&Value::Object(fields.clone()))?;

        // json_patch applies RFC 7396 merge semantics in a single statement,
        // so a reader sees the record before or after the whole merge.
        sqlx::query(
            r#"
            INSERT INTO user_settings (user_id, fields)
            VALUES (?1, json_patch('{}', json(?2)))
            ON CONFLICT(user_id) DO UPDATE SET
                fields = json_patch(user_settings.fields, json(?2)),
                updated_at = datetime('now', 'utc')
            "#,
        )
        .bind(user_id)
        .bind(&patch)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(())
    }

    async fn get(&self, user_id: i64) -> StorageResult<SettingsRecord> {
        debug!("Fetching settings for user: {}", user_id);

        let row = sqlx::query("SELECT user_id, fields, updated_at FROM user_settings WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        match row {
            Some(row) => self.row_to_record(&row),
            None => Ok(SettingsRecord::empty(user_id)),
        }
    }
}
