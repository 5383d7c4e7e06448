// ABOUTME: Orchestration of settings updates and avatar reads/writes
// ABOUTME: Validate, then avatar write, then settings write, serialized per user

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

use plume_storage::{AvatarAsset, AvatarStore, SettingsRecord, SettingsStore, StorageError};

use crate::types::AvatarUpload;
use crate::validation::{self, ValidationError, AVATAR_CONTENT_TYPE};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Coordinates the validation pipeline and the two stores. Holds no settings
/// or avatar state of its own; every call reads from the store of record.
pub struct SettingsService {
    settings: Arc<dyn SettingsStore>,
    avatars: Arc<dyn AvatarStore>,
    user_locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl SettingsService {
    pub fn new(settings: Arc<dyn SettingsStore>, avatars: Arc<dyn AvatarStore>) -> Self {
        Self {
            settings,
            avatars,
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Update a user's settings and, when supplied, replace their avatar.
    ///
    /// Validation failures abort before any store is touched. The avatar
    /// write happens before the settings write; if it fails the settings
    /// write is skipped, so a success always means both artifacts are
    /// durable. Updates for the same user are serialized, so the final
    /// avatar/fields pair always comes from a single call.
    pub async fn update_settings(
        &self,
        user_id: i64,
        fields: Map<String, Value>,
        avatar: Option<AvatarUpload>,
    ) -> Result<(), ServiceError> {
        validation::validate_avatar(avatar.as_ref())?;

        let lock = self.user_lock(user_id).await;
        let result = async {
            let _guard = lock.lock().await;

            if let Some(avatar) = &avatar {
                self.avatars
                    .put(user_id, &avatar.content, AVATAR_CONTENT_TYPE)
                    .await?;
                debug!(
                    "Avatar replaced for user {} ({} bytes)",
                    user_id,
                    avatar.size_bytes()
                );
            }

            self.settings.upsert(user_id, &fields).await
        }
        .await;
        self.release_user_lock(user_id, &lock).await;
        result?;

        info!(
            "Settings updated for user {} ({} field(s), avatar: {})",
            user_id,
            fields.len(),
            avatar.is_some()
        );
        Ok(())
    }

    /// Current settings record; the empty default if the user never wrote any
    pub async fn get_settings(&self, user_id: i64) -> Result<SettingsRecord, ServiceError> {
        Ok(self.settings.get(user_id).await?)
    }

    /// Current avatar bytes; `None` is a valid terminal state, not an error
    pub async fn get_avatar(&self, user_id: i64) -> Result<Option<AvatarAsset>, ServiceError> {
        Ok(self.avatars.get(user_id).await?)
    }

    async fn user_lock(&self, user_id: i64) -> Arc<Mutex<()>> {
        let mut locks = self.user_locks.lock().await;
        locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the map entry once no other task holds the lock, so the map
    /// tracks in-flight users rather than every user ever seen.
    async fn release_user_lock(&self, user_id: i64, lock: &Arc<Mutex<()>>) {
        let mut locks = self.user_locks.lock().await;
        // Two references: the map's and ours. New clones only appear while
        // holding the map lock, so this check cannot race a waiter.
        if Arc::strong_count(lock) == 2 {
            locks.remove(&user_id);
        }
    }

    #[cfg(test)]
    pub(crate) async fn user_lock_count(&self) -> usize {
        self.user_locks.lock().await.len()
    }
}
