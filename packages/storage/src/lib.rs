// ABOUTME: Data layer and persistence for Plume
// ABOUTME: SQLite-backed stores for user settings records and avatar binaries

use thiserror::Error;

pub mod avatars;
pub mod db;
pub mod settings;

#[cfg(test)]
mod avatars_tests;
#[cfg(test)]
mod db_tests;

pub use avatars::{AvatarAsset, AvatarStore, SqliteAvatarStore};
pub use db::Database;
pub use settings::{SettingsRecord, SettingsStore, SqliteSettingsStore};

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;
