// ABOUTME: Integration tests for the avatar store
// ABOUTME: Bit-exact round-trips and overwrite semantics against in-memory SQLite

#[cfg(test)]
mod tests {
    use crate::avatars::{AvatarStore, SqliteAvatarStore};
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    const JPEG_SOI: [u8; 3] = [0xFF, 0xD8, 0xFF];

    async fn setup_store() -> SqliteAvatarStore {
        let options = SqliteConnectOptions::from_str(":memory:")
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();

        sqlx::migrate!("./migrations").run(&pool).await.unwrap();

        SqliteAvatarStore::new(pool)
    }

    fn jpeg_bytes(len: usize) -> Vec<u8> {
        let mut bytes = JPEG_SOI.to_vec();
        bytes.extend((0..len.saturating_sub(3)).map(|i| (i % 251) as u8));
        bytes
    }

    #[tokio::test]
    async fn test_get_unknown_user_returns_none() {
        let store = setup_store().await;

        let asset = store.get(99).await.unwrap();
        assert!(asset.is_none());
    }

    #[tokio::test]
    async fn test_put_then_get_round_trips_exact_bytes() {
        let store = setup_store().await;
        let content = jpeg_bytes(4096);

        store.put(1, &content, "image/jpeg").await.unwrap();

        let asset = store.get(1).await.unwrap().unwrap();
        assert_eq!(asset.content, content);
        assert_eq!(asset.content_type, "image/jpeg");
        assert_eq!(asset.size_bytes, content.len() as i64);
    }

    #[tokio::test]
    async fn test_put_replaces_prior_avatar_in_full() {
        let store = setup_store().await;
        let first = jpeg_bytes(1024);
        let second = jpeg_bytes(2000);

        store.put(1, &first, "image/jpeg").await.unwrap();
        store.put(1, &second, "image/jpeg").await.unwrap();

        let asset = store.get(1).await.unwrap().unwrap();
        assert_eq!(asset.content, second);
        assert_eq!(asset.size_bytes, second.len() as i64);
    }

    #[tokio::test]
    async fn test_put_is_idempotent() {
        let store = setup_store().await;
        let content = jpeg_bytes(512);

        store.put(1, &content, "image/jpeg").await.unwrap();
        store.put(1, &content, "image/jpeg").await.unwrap();

        let asset = store.get(1).await.unwrap().unwrap();
        assert_eq!(asset.content, content);
    }

    #[tokio::test]
    async fn test_avatars_are_isolated_per_user() {
        let store = setup_store().await;
        let a = jpeg_bytes(100);
        let b = jpeg_bytes(200);

        store.put(1, &a, "image/jpeg").await.unwrap();
        store.put(2, &b, "image/jpeg").await.unwrap();

        assert_eq!(store.get(1).await.unwrap().unwrap().content, a);
        assert_eq!(store.get(2).await.unwrap().unwrap().content, b);
    }
}
