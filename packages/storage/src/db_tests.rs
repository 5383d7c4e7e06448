// ABOUTME: Tests for database initialization against a real file path
// ABOUTME: Covers directory creation, migrations and reopening an existing file

#[cfg(test)]
mod tests {
    use crate::{Database, SettingsStore, SqliteSettingsStore};
    use serde_json::{json, Map, Value};

    #[tokio::test]
    async fn test_init_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("plume.db");

        let database = Database::init_with_path(Some(path.clone())).await.unwrap();
        assert!(path.exists());

        // Migrations ran: the settings table is queryable
        sqlx::query("SELECT COUNT(*) FROM user_settings")
            .fetch_one(&database.pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_reopening_existing_database_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plume.db");

        {
            let database = Database::init_with_path(Some(path.clone())).await.unwrap();
            let store = SqliteSettingsStore::new(database.pool.clone());
            let mut fields = Map::new();
            fields.insert("theme".to_string(), Value::from("dark"));
            store.upsert(1, &fields).await.unwrap();
            database.pool.close().await;
        }

        let database = Database::init_with_path(Some(path)).await.unwrap();
        let store = SqliteSettingsStore::new(database.pool.clone());
        let record = store.get(1).await.unwrap();
        assert_eq!(record.fields.get("theme"), Some(&json!("dark")));
    }
}
